#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::MockServer;

use admin_infrastructure::BackendClient;
use admin_shared::config::BackendSettings;

pub const SERVICE_KEY: &str = "service-role-key";

pub fn client_for(server: &MockServer) -> Arc<BackendClient> {
    let settings = BackendSettings {
        url: format!("{}/", server.uri()),
        service_role_key: SERVICE_KEY.to_string(),
        timeout_seconds: 5,
    };
    Arc::new(BackendClient::new(&settings).expect("client"))
}

pub fn profile_json(id: Uuid, email: &str, rol: Option<&str>) -> Value {
    json!({
        "id": id,
        "email": email,
        "nombre_completo": null,
        "rol_id": null,
        "roles": rol.map(|r| json!({ "nombre": r })),
        "activo": true,
        "created_at": "2026-03-01T10:00:00Z",
    })
}

pub fn role_json(id: Uuid, nombre: &str, permisos: &[&str]) -> Value {
    json!({
        "id": id,
        "nombre": nombre,
        "descripcion": null,
        "color": "#2563EB",
        "permisos": permisos,
        "activo": true,
        "es_sistema": false,
        "created_at": "2026-03-01T10:00:00Z",
    })
}

pub fn report_json(id: Uuid, estado: &str) -> Value {
    json!({
        "id": id,
        "titulo": "Bache en avenida",
        "estado": estado,
        "prioridad": "alta",
        "latitud": 19.43,
        "longitud": -99.13,
        "created_at": "2026-03-01T10:00:00Z",
    })
}

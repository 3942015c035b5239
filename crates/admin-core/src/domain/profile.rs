// ============================================================================
// Admin Core - Profile Entity
// File: crates/admin-core/src/domain/profile.rs
// Description: Application users (`profiles` table, linked to auth users)
// ============================================================================

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9()\- ]{7,20}$").expect("valid phone regex"));

/// Role name embedded by the backend when listing profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub nombre: String,
}

/// Profile record as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub nombre_completo: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub rol_id: Option<Uuid>,
    #[serde(default, rename = "roles")]
    pub rol: Option<RoleRef>,
    pub activo: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ultimo_acceso: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.nombre_completo
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }

    pub fn rol_nombre(&self) -> Option<&str> {
        self.rol.as_ref().map(|r| r.nombre.as_str())
    }
}

/// Payload for creating a user. `rol` is a role name resolved by the service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email(message = "Correo electrónico inválido"))]
    pub email: String,

    #[serde(skip_serializing)]
    #[validate(length(min = 8, max = 72, message = "La contraseña debe tener entre 8 y 72 caracteres"))]
    pub password: String,

    #[validate(length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres"))]
    pub nombre_completo: String,

    #[validate(regex(path = *PHONE, message = "Teléfono inválido"))]
    pub telefono: Option<String>,

    #[validate(length(min = 1, message = "El rol es obligatorio"))]
    pub rol: String,

    #[serde(default = "default_true")]
    pub activo: bool,
}

fn default_true() -> bool {
    true
}

impl NewUser {
    pub fn new(
        email: String,
        password: String,
        nombre_completo: String,
        telefono: Option<String>,
        rol: String,
        activo: bool,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            email: email.trim().to_lowercase(),
            password,
            nombre_completo: nombre_completo.trim().to_string(),
            telefono: telefono.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            rol: rol.trim().to_string(),
            activo,
        };
        user.validate()?;
        Ok(user)
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 100, message = "El nombre debe tener entre 2 y 100 caracteres"))]
    pub nombre_completo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE, message = "Teléfono inválido"))]
    pub telefono: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rol_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "URL de avatar inválida"))]
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.nombre_completo.is_none()
            && self.telefono.is_none()
            && self.rol_id.is_none()
            && self.activo.is_none()
            && self.avatar_url.is_none()
    }
}

/// Flattens `validator` errors into `field: message` strings.
pub fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{}: {}", field, msg),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    messages.sort();
    messages
}

#[cfg(test)]
pub(crate) fn sample_profile(email: &str, rol: Option<&str>) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        email: email.to_string(),
        nombre_completo: None,
        telefono: None,
        rol_id: None,
        rol: rol.map(|r| RoleRef { nombre: r.to_string() }),
        activo: true,
        avatar_url: None,
        created_at: Utc::now(),
        ultimo_acceso: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(email: &str) -> Result<NewUser, validator::ValidationErrors> {
        NewUser::new(
            email.to_string(),
            "s3gura-Clave".to_string(),
            "Ana Pérez".to_string(),
            Some("+52 (55) 1234-5678".to_string()),
            "usuario".to_string(),
            true,
        )
    }

    #[test]
    fn test_valid_user() {
        let user = build("  Ana.Perez@Example.com ").unwrap();
        assert_eq!(user.email, "ana.perez@example.com");
    }

    #[test]
    fn test_email_validation_rejects_malformed() {
        for bad in ["ana", "ana@", "@example.com", "ana example@x.com", ""] {
            let err = build(bad).unwrap_err();
            assert!(validation_messages(&err).iter().any(|m| m.starts_with("email:")), "{bad}");
        }
    }

    #[test]
    fn test_phone_validation() {
        let err = NewUser::new(
            "ana@example.com".into(),
            "s3gura-Clave".into(),
            "Ana".into(),
            Some("call me".into()),
            "usuario".into(),
            true,
        )
        .unwrap_err();
        assert_eq!(validation_messages(&err), vec!["telefono: Teléfono inválido".to_string()]);
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut profile = sample_profile("luis@example.com", Some("usuario"));
        assert_eq!(profile.display_name(), "luis@example.com");
        profile.nombre_completo = Some("Luis Gómez".into());
        assert_eq!(profile.display_name(), "Luis Gómez");
        assert_eq!(profile.rol_nombre(), Some("usuario"));
    }

    #[test]
    fn test_embedded_role_deserializes() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "email": "luis@example.com",
            "rol_id": Uuid::new_v4(),
            "roles": { "nombre": "supervisor" },
            "activo": true,
            "created_at": "2024-05-02T08:30:00Z"
        });
        let profile: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.rol_nombre(), Some("supervisor"));
    }
}

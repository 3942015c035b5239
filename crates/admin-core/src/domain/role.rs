// ============================================================================
// Admin Core - Role Entity
// File: crates/admin-core/src/domain/role.rs
// Description: Named permission bundles (`roles` table)
// ============================================================================

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use super::permission::Permission;

pub static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("valid color regex"));

/// Role names that are always treated as system roles, whatever the
/// `es_sistema` flag says.
pub const PROTECTED_ROLE_NAMES: [&str; 3] = ["admin", "administrador", "superadmin"];

/// Role record as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_permissions")]
    pub permisos: Vec<Permission>,
    pub activo: bool,
    #[serde(default)]
    pub es_sistema: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Role {
    pub fn is_protected(&self) -> bool {
        self.es_sistema || is_protected_name(&self.nombre)
    }

    /// The activo toggle is disabled for protected roles.
    pub fn can_toggle_status(&self) -> bool {
        !self.is_protected()
    }

    pub fn can_delete(&self) -> bool {
        !self.is_protected()
    }

    /// Inactive roles grant nothing.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.activo && self.permisos.contains(&permission)
    }

    pub fn effective_permissions(&self) -> Vec<Permission> {
        if self.activo {
            self.permisos.clone()
        } else {
            Vec::new()
        }
    }
}

pub fn is_protected_name(nombre: &str) -> bool {
    let nombre = nombre.trim();
    PROTECTED_ROLE_NAMES.iter().any(|p| p.eq_ignore_ascii_case(nombre))
}

fn lenient_permissions<'de, D>(deserializer: D) -> Result<Vec<Permission>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<String>> = Option::deserialize(deserializer)?;
    let mut permisos = Vec::new();
    for name in raw.unwrap_or_default() {
        match Permission::from_str(&name) {
            Some(p) if !permisos.contains(&p) => permisos.push(p),
            Some(_) => {}
            None => warn!("Ignoring unknown permission stored on role: {}", name),
        }
    }
    Ok(permisos)
}

/// Payload for creating a role
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewRole {
    #[validate(length(min = 2, max = 50, message = "El nombre debe tener entre 2 y 50 caracteres"))]
    pub nombre: String,

    #[validate(length(max = 255, message = "La descripción no puede superar 255 caracteres"))]
    pub descripcion: Option<String>,

    #[validate(regex(path = *HEX_COLOR, message = "El color debe ser hexadecimal (#RGB o #RRGGBB)"))]
    pub color: String,

    #[serde(default)]
    pub permisos: Vec<Permission>,

    #[serde(default = "default_true")]
    pub activo: bool,
}

fn default_true() -> bool {
    true
}

impl NewRole {
    pub fn new(
        nombre: String,
        descripcion: Option<String>,
        color: String,
        permisos: Vec<Permission>,
        activo: bool,
    ) -> Result<Self, validator::ValidationErrors> {
        let role = Self {
            nombre: nombre.trim().to_string(),
            descripcion: descripcion.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            color: color.trim().to_uppercase(),
            permisos,
            activo,
        };
        role.validate()?;
        Ok(role)
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RoleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 50, message = "El nombre debe tener entre 2 y 50 caracteres"))]
    pub nombre: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 255, message = "La descripción no puede superar 255 caracteres"))]
    pub descripcion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *HEX_COLOR, message = "El color debe ser hexadecimal (#RGB o #RRGGBB)"))]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permisos: Option<Vec<Permission>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

impl RoleUpdate {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.descripcion.is_none()
            && self.color.is_none()
            && self.permisos.is_none()
            && self.activo.is_none()
    }
}

#[cfg(test)]
pub(crate) fn sample_role(nombre: &str, permisos: Vec<Permission>) -> Role {
    Role {
        id: Uuid::new_v4(),
        nombre: nombre.to_string(),
        descripcion: None,
        color: Some("#2563EB".to_string()),
        permisos,
        activo: true,
        es_sistema: false,
        created_at: Utc::now(),
        updated_at: None,
    }
}

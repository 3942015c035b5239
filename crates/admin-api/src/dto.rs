//! Request queries and response views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use admin_core::domain::{BoundingBox, Operation, Profile, ReportPriority, ReportStatus, Role};
use admin_core::filter::{ActivityFilter, ChangeFilter, ReportFilter, RoleFilter, UserFilter};
use admin_core::import::{ImportPreview, ImportedUser};
use admin_core::NewRole;
use admin_shared::constants::DEFAULT_PAGE_SIZE;
use admin_shared::Pagination;

use crate::error::ApiError;

fn pagination(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    Pagination::new(page.unwrap_or(1), per_page.unwrap_or(DEFAULT_PAGE_SIZE))
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub rol: Option<String>,
    pub activo: Option<bool>,
}

impl UserListQuery {
    pub fn into_parts(self) -> (UserFilter, Pagination) {
        let filter = UserFilter { search: self.search, rol: self.rol, activo: self.activo };
        (filter, pagination(self.page, self.per_page))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub activo: Option<bool>,
}

impl RoleListQuery {
    pub fn into_parts(self) -> (RoleFilter, Pagination) {
        let filter = RoleFilter { search: self.search, activo: self.activo };
        (filter, pagination(self.page, self.per_page))
    }
}

/// Enum values arrive as plain strings so a bad value gets our own 400.
#[derive(Debug, Default, Deserialize)]
pub struct ReportListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub estado: Option<String>,
    pub prioridad: Option<String>,
    pub categoria: Option<String>,
    pub asignado_a: Option<Uuid>,
    /// `min_lon,min_lat,max_lon,max_lat`
    pub bbox: Option<String>,
}

impl ReportListQuery {
    pub fn into_parts(self) -> Result<(ReportFilter, Pagination), ApiError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let estado = non_empty(self.estado)
            .map(|s| ReportStatus::from_str(&s).ok_or_else(|| ApiError::BadRequest(format!("Estado inválido: {}", s))))
            .transpose()?;
        let prioridad = non_empty(self.prioridad)
            .map(|s| {
                ReportPriority::from_str(&s).ok_or_else(|| ApiError::BadRequest(format!("Prioridad inválida: {}", s)))
            })
            .transpose()?;
        let bbox = non_empty(self.bbox)
            .map(|s| BoundingBox::parse(&s).ok_or_else(|| ApiError::BadRequest(format!("bbox inválido: {}", s))))
            .transpose()?;

        let filter = ReportFilter {
            search: self.search,
            estado,
            prioridad,
            categoria: self.categoria,
            asignado_a: self.asignado_a,
            bbox,
        };
        Ok((filter, pagination(self.page, self.per_page)))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub accion: Option<String>,
    pub entidad: Option<String>,
    pub usuario: Option<String>,
    pub desde: Option<DateTime<Utc>>,
    pub hasta: Option<DateTime<Utc>>,
}

impl ActivityQuery {
    pub fn into_parts(self) -> (ActivityFilter, Pagination) {
        let filter = ActivityFilter {
            accion: self.accion,
            entidad: self.entidad,
            usuario: self.usuario,
            desde: self.desde,
            hasta: self.hasta,
        };
        (filter, pagination(self.page, self.per_page))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub tabla: Option<String>,
    pub operacion: Option<String>,
    pub registro_id: Option<String>,
}

impl ChangeQuery {
    pub fn into_parts(self) -> Result<(ChangeFilter, Pagination), ApiError> {
        let operacion = self
            .operacion
            .filter(|s| !s.trim().is_empty())
            .map(|s| Operation::from_str(&s).ok_or_else(|| ApiError::BadRequest(format!("Operación inválida: {}", s))))
            .transpose()?;
        let filter = ChangeFilter { tabla: self.tabla, operacion, registro_id: self.registro_id };
        Ok((filter, pagination(self.page, self.per_page)))
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub estado: ReportStatus,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub asignado_a: Option<Uuid>,
}

/// Profile as shown in the users table.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub nombre: String,
    pub nombre_completo: Option<String>,
    pub telefono: Option<String>,
    pub rol_id: Option<Uuid>,
    pub rol_nombre: Option<String>,
    pub activo: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub ultimo_acceso: Option<DateTime<Utc>>,
}

impl From<Profile> for UserDto {
    fn from(p: Profile) -> Self {
        Self {
            nombre: p.display_name().to_string(),
            rol_nombre: p.rol_nombre().map(str::to_string),
            id: p.id,
            email: p.email,
            nombre_completo: p.nombre_completo,
            telefono: p.telefono,
            rol_id: p.rol_id,
            activo: p.activo,
            avatar_url: p.avatar_url,
            created_at: p.created_at,
            ultimo_acceso: p.ultimo_acceso,
        }
    }
}

/// Role plus the flags the UI uses to disable controls.
#[derive(Debug, Serialize)]
pub struct RoleDto {
    #[serde(flatten)]
    pub role: Role,
    pub protegido: bool,
    pub puede_cambiar_estado: bool,
    pub puede_eliminar: bool,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        Self {
            protegido: role.is_protected(),
            puede_cambiar_estado: role.can_toggle_status(),
            puede_eliminar: role.can_delete(),
            role,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PreviewDto {
    Users(ImportPreview<ImportedUser>),
    Roles(ImportPreview<NewRole>),
}

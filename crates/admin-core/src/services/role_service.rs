// ============================================================================
// Admin Core - Role Service
// File: crates/admin-core/src/services/role_service.rs
// Description: Role administration and permission resolution
// ============================================================================

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use admin_shared::{Page, Pagination};

use super::{Actor, AuditService};
use crate::domain::{is_protected_name, NewActivity, NewRole, Permission, Role, RoleUpdate};
use crate::error::DomainError;
use crate::filter::{apply, RoleFilter};
use crate::repositories::{ProfileRepository, RoleRepository};

const ENTITY: &str = "rol";

pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
    profiles: Arc<dyn ProfileRepository>,
    audit: AuditService,
}

impl RoleService {
    pub fn new(roles: Arc<dyn RoleRepository>, profiles: Arc<dyn ProfileRepository>, audit: AuditService) -> Self {
        Self { roles, profiles, audit }
    }

    pub async fn list(&self, filter: &RoleFilter, pagination: &Pagination) -> Result<Page<Role>, DomainError> {
        let roles = self.roles.list().await?;
        Ok(apply(roles, filter, pagination))
    }

    pub async fn get(&self, id: &Uuid) -> Result<Role, DomainError> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::RoleNotFound(id.to_string()))
    }

    /// Permissions granted by the named role; empty for unknown or inactive
    /// roles.
    pub async fn permissions_for(&self, rol_nombre: Option<&str>) -> Result<Vec<Permission>, DomainError> {
        let Some(nombre) = rol_nombre.filter(|n| !n.trim().is_empty()) else {
            return Ok(Vec::new());
        };
        Ok(self
            .roles
            .find_by_name(nombre)
            .await?
            .map(|r| r.effective_permissions())
            .unwrap_or_default())
    }

    async fn ensure_name_free(&self, nombre: &str, except: Option<Uuid>) -> Result<(), DomainError> {
        if is_protected_name(nombre) {
            warn!("Role name '{}' is reserved", nombre);
            return Err(DomainError::ProtectedRole(nombre.to_string()));
        }
        match self.roles.find_by_name(nombre).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(DomainError::RoleNameAlreadyExists(existing.nombre))
            }
            _ => Ok(()),
        }
    }

    pub async fn create(&self, actor: &Actor, role: NewRole) -> Result<Role, DomainError> {
        let role = NewRole::new(role.nombre, role.descripcion, role.color, role.permisos, role.activo)?;
        self.ensure_name_free(&role.nombre, None).await?;

        let created = self.roles.create(&role).await?;
        info!("Role created: {} ({})", created.nombre, created.id);

        self.audit
            .record(
                NewActivity::builder("crear", ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(created.id)
                    .descripcion(format!("Rol {} creado", created.nombre))
                    .metadata("permisos", created.permisos.len())
                    .build(),
            )
            .await;

        Ok(created)
    }

    /// System roles keep their name and status; description, colour and
    /// permissions stay editable.
    pub async fn update(&self, actor: &Actor, id: &Uuid, mut changes: RoleUpdate) -> Result<Role, DomainError> {
        changes.nombre = changes.nombre.map(|n| n.trim().to_string());
        changes.color = changes.color.map(|c| c.trim().to_uppercase());
        changes.validate()?;
        if changes.is_empty() {
            return Err(DomainError::ValidationError("No hay cambios que guardar".to_string()));
        }

        let current = self.get(id).await?;
        let renamed = changes.nombre.as_deref().is_some_and(|n| n != current.nombre);
        let status_change = changes.activo.is_some_and(|a| a != current.activo);

        if current.is_protected() && (renamed || status_change) {
            warn!("Rejected rename/status change of system role '{}'", current.nombre);
            return Err(DomainError::ProtectedRole(current.nombre));
        }
        if let (true, Some(nombre)) = (renamed, changes.nombre.as_deref()) {
            self.ensure_name_free(nombre, Some(current.id)).await?;
        }

        let updated = self.roles.update(id, &changes).await?;
        info!("Role updated: {} ({})", updated.nombre, id);

        self.audit
            .record(
                NewActivity::builder("actualizar", ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(id)
                    .descripcion(format!("Rol {} actualizado", updated.nombre))
                    .build(),
            )
            .await;

        Ok(updated)
    }

    pub async fn toggle_active(&self, actor: &Actor, id: &Uuid) -> Result<Role, DomainError> {
        let current = self.get(id).await?;
        if !current.can_toggle_status() {
            warn!("Rejected status toggle of system role '{}'", current.nombre);
            return Err(DomainError::ProtectedRole(current.nombre));
        }

        let updated = self.roles.set_active(id, !current.activo).await?;
        let accion = if updated.activo { "activar" } else { "desactivar" };
        info!("Role {}: {}", accion, updated.nombre);

        self.audit
            .record(
                NewActivity::builder(accion, ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(id)
                    .descripcion(format!("Rol {} {}", updated.nombre, if updated.activo { "activado" } else { "desactivado" }))
                    .build(),
            )
            .await;

        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: &Uuid) -> Result<(), DomainError> {
        let current = self.get(id).await?;
        if !current.can_delete() {
            warn!("Rejected deletion of system role '{}'", current.nombre);
            return Err(DomainError::ProtectedRole(current.nombre));
        }

        let users = self
            .profiles
            .list()
            .await?
            .iter()
            .filter(|p| p.rol_id == Some(current.id))
            .count();
        if users > 0 {
            warn!("Role '{}' still assigned to {} user(s)", current.nombre, users);
            return Err(DomainError::RoleInUse { nombre: current.nombre, users });
        }

        self.roles.delete(id).await?;
        info!("Role deleted: {} ({})", current.nombre, id);

        self.audit
            .record(
                NewActivity::builder("eliminar", ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(id)
                    .descripcion(format!("Rol {} eliminado", current.nombre))
                    .build(),
            )
            .await;

        Ok(())
    }
}

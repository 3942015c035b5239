// ============================================================================
// Admin Infrastructure - Role Repository
// File: crates/admin-infrastructure/src/repositories/role_repo_impl.rs
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use admin_core::domain::{NewRole, Role, RoleUpdate};
use admin_core::error::DomainError;
use admin_core::repositories::RoleRepository;

use crate::backend::{eq, BackendClient, BackendError};

const TABLE: &str = "roles";

pub struct BackendRoleRepository {
    client: Arc<BackendClient>,
}

impl BackendRoleRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    fn first(rows: Vec<Role>, id: &Uuid) -> Result<Role, DomainError> {
        rows.into_iter().next().ok_or_else(|| DomainError::RoleNotFound(id.to_string()))
    }

    fn conflict_or(e: BackendError, nombre: Option<&str>) -> DomainError {
        match nombre {
            Some(n) if e.is_conflict() => DomainError::RoleNameAlreadyExists(n.to_string()),
            _ => e.into(),
        }
    }
}

#[async_trait]
impl RoleRepository for BackendRoleRepository {
    async fn list(&self) -> Result<Vec<Role>, DomainError> {
        Ok(self
            .client
            .select(TABLE, &[("select", "*".to_string()), ("order", "nombre.asc".to_string())])
            .await?)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Role>, DomainError> {
        let rows: Vec<Role> = self
            .client
            .select(TABLE, &[("select", "*".to_string()), eq("id", id), ("limit", "1".to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Matched here rather than with `ilike`, where `_` is a wildcard.
    async fn find_by_name(&self, nombre: &str) -> Result<Option<Role>, DomainError> {
        let nombre = nombre.trim();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|r| r.nombre.trim().eq_ignore_ascii_case(nombre)))
    }

    async fn create(&self, role: &NewRole) -> Result<Role, DomainError> {
        let rows: Vec<Role> = self
            .client
            .insert(TABLE, role)
            .await
            .map_err(|e| Self::conflict_or(e, Some(role.nombre.as_str())))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| DomainError::BackendError("Role insert returned no rows".to_string()))
    }

    async fn update(&self, id: &Uuid, changes: &RoleUpdate) -> Result<Role, DomainError> {
        let rows: Vec<Role> = self
            .client
            .update(TABLE, &[eq("id", id)], changes)
            .await
            .map_err(|e| Self::conflict_or(e, changes.nombre.as_deref()))?;
        Self::first(rows, id)
    }

    async fn set_active(&self, id: &Uuid, activo: bool) -> Result<Role, DomainError> {
        let rows: Vec<Role> = self.client.update(TABLE, &[eq("id", id)], &json!({ "activo": activo })).await?;
        Self::first(rows, id)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        self.client.delete(TABLE, &[eq("id", id)]).await?;
        Ok(())
    }
}

//! Role repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewRole, Role, RoleUpdate};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Role>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Role>, DomainError>;
    /// Case-insensitive lookup.
    async fn find_by_name(&self, nombre: &str) -> Result<Option<Role>, DomainError>;
    async fn create(&self, role: &NewRole) -> Result<Role, DomainError>;
    async fn update(&self, id: &Uuid, changes: &RoleUpdate) -> Result<Role, DomainError>;
    async fn set_active(&self, id: &Uuid, activo: bool) -> Result<Role, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
}

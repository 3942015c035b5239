//! Profile repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewUser, Profile, ProfileUpdate};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// All profiles with their role name embedded.
    async fn list(&self) -> Result<Vec<Profile>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Profile>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, DomainError>;
    /// Creates the auth account and fills in its profile row.
    async fn create(&self, user: &NewUser, rol_id: &Uuid) -> Result<Profile, DomainError>;
    async fn update(&self, id: &Uuid, changes: &ProfileUpdate) -> Result<Profile, DomainError>;
    async fn set_active(&self, id: &Uuid, activo: bool) -> Result<Profile, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
}

//! Report repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Report, ReportStatus};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<Report>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Report>, DomainError>;
    async fn update_status(&self, id: &Uuid, estado: ReportStatus) -> Result<Report, DomainError>;
    /// `None` clears the assignment.
    async fn assign(&self, id: &Uuid, asignado_a: Option<Uuid>) -> Result<Report, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
}

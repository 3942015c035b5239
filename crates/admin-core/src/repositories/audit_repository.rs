//! Audit repository trait (port): activity log and change history

use async_trait::async_trait;

use crate::domain::{ActivityEntry, ChangeRecord, NewActivity};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn recent_activities(&self, limit: usize) -> Result<Vec<ActivityEntry>, DomainError>;
    async fn change_history(
        &self,
        tabla: Option<String>,
        registro_id: Option<String>,
        limit: usize,
    ) -> Result<Vec<ChangeRecord>, DomainError>;
    async fn record(&self, activity: &NewActivity) -> Result<(), DomainError>;
}

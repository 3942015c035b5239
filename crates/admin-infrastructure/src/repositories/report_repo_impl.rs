// ============================================================================
// Admin Infrastructure - Report Repository
// File: crates/admin-infrastructure/src/repositories/report_repo_impl.rs
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use admin_core::domain::{Report, ReportStatus};
use admin_core::error::DomainError;
use admin_core::repositories::ReportRepository;

use crate::backend::{eq, BackendClient};

const TABLE: &str = "reportes";

pub struct BackendReportRepository {
    client: Arc<BackendClient>,
}

impl BackendReportRepository {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    async fn patch(&self, id: &Uuid, body: serde_json::Value) -> Result<Report, DomainError> {
        let rows: Vec<Report> = self.client.update(TABLE, &[eq("id", id)], &body).await?;
        rows.into_iter().next().ok_or(DomainError::ReportNotFound(*id))
    }
}

#[async_trait]
impl ReportRepository for BackendReportRepository {
    async fn list(&self) -> Result<Vec<Report>, DomainError> {
        Ok(self
            .client
            .select(TABLE, &[("select", "*".to_string()), ("order", "created_at.desc".to_string())])
            .await?)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Report>, DomainError> {
        let rows: Vec<Report> = self
            .client
            .select(TABLE, &[("select", "*".to_string()), eq("id", id), ("limit", "1".to_string())])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn update_status(&self, id: &Uuid, estado: ReportStatus) -> Result<Report, DomainError> {
        self.patch(id, json!({ "estado": estado })).await
    }

    async fn assign(&self, id: &Uuid, asignado_a: Option<Uuid>) -> Result<Report, DomainError> {
        self.patch(id, json!({ "asignado_a": asignado_a })).await
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        self.client.delete(TABLE, &[eq("id", id)]).await?;
        Ok(())
    }
}

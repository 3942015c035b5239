// ============================================================================
// Admin Core - Audit Service
// File: crates/admin-core/src/services/audit_service.rs
// Description: Activity log queries, change history with diffs, recording
// ============================================================================

use std::sync::Arc;

use tracing::{debug, error};

use admin_shared::{Page, Pagination};

use crate::domain::{ActivityEntry, ChangeView, NewActivity};
use crate::error::DomainError;
use crate::filter::{apply, ActivityFilter, ChangeFilter};
use crate::repositories::AuditRepository;

/// How many rows are fetched from the backend RPCs before filtering.
pub const AUDIT_FETCH_LIMIT: usize = 500;

#[derive(Clone)]
pub struct AuditService {
    repo: Arc<dyn AuditRepository>,
}

impl AuditService {
    pub fn new(repo: Arc<dyn AuditRepository>) -> Self {
        Self { repo }
    }

    pub async fn activities(
        &self,
        filter: &ActivityFilter,
        pagination: &Pagination,
    ) -> Result<Page<ActivityEntry>, DomainError> {
        let entries = self.repo.recent_activities(AUDIT_FETCH_LIMIT).await?;
        Ok(apply(entries, filter, pagination))
    }

    /// Change records with their field-level diff. `tabla` and
    /// `registro_id` are pushed down to the backend, the rest is filtered
    /// here.
    pub async fn changes(
        &self,
        filter: &ChangeFilter,
        pagination: &Pagination,
    ) -> Result<Page<ChangeView>, DomainError> {
        let records = self
            .repo
            .change_history(
                filter.tabla.clone().filter(|t| !t.is_empty()),
                filter.registro_id.clone().filter(|r| !r.is_empty()),
                AUDIT_FETCH_LIMIT,
            )
            .await?;
        Ok(apply(records, filter, pagination).map(ChangeView::from))
    }

    /// Best effort: a failed write is logged and otherwise ignored.
    pub async fn record(&self, activity: NewActivity) {
        match self.repo.record(&activity).await {
            Ok(()) => debug!(accion = %activity.accion, entidad = %activity.entidad, "Activity recorded"),
            Err(e) => error!(
                accion = %activity.accion,
                entidad = %activity.entidad,
                "Failed to record activity: {}",
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChangeKind, ChangeRecord, Operation};
    use crate::repositories::MockAuditRepository;
    use chrono::Utc;
    use mockall::predicate::eq;
    use serde_json::json;
    use uuid::Uuid;

    fn change(op: Operation, before: Option<serde_json::Value>, after: Option<serde_json::Value>) -> ChangeRecord {
        ChangeRecord {
            id: Uuid::new_v4(),
            tabla: "roles".to_string(),
            registro_id: "r-1".to_string(),
            operacion: op,
            datos_anteriores: before,
            datos_nuevos: after,
            usuario_id: None,
            usuario_email: Some("admin@example.com".to_string()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_changes_are_filtered_and_diffed() {
        let mut repo = MockAuditRepository::new();
        repo.expect_change_history()
            .with(eq(Some("roles".to_string())), eq(None), eq(AUDIT_FETCH_LIMIT))
            .returning(|_, _, _| {
                Ok(vec![
                    change(
                        Operation::Update,
                        Some(json!({"nombre": "Inspector", "activo": true, "updated_at": "a"})),
                        Some(json!({"nombre": "Inspector", "activo": false, "updated_at": "b"})),
                    ),
                    change(Operation::Insert, None, Some(json!({"nombre": "Inspector"}))),
                ])
            });

        let service = AuditService::new(Arc::new(repo));
        let filter = ChangeFilter {
            tabla: Some("roles".to_string()),
            operacion: Some(Operation::Update),
            registro_id: None,
        };
        let page = service.changes(&filter, &Pagination::default()).await.unwrap();

        assert_eq!(page.total, 1);
        let view = &page.items[0];
        assert_eq!(view.operacion_label, Operation::Update.label());
        assert_eq!(view.cambios.len(), 1);
        assert_eq!(view.cambios[0].campo, "activo");
        assert_eq!(view.cambios[0].kind, ChangeKind::Modified);
        assert_eq!(view.cambios[0].nuevo_texto, "No");
    }

    #[tokio::test]
    async fn test_record_swallows_backend_errors() {
        let mut repo = MockAuditRepository::new();
        repo.expect_record()
            .times(1)
            .returning(|_| Err(DomainError::BackendError("timeout".to_string())));

        let service = AuditService::new(Arc::new(repo));
        service.record(NewActivity::builder("crear", "rol").build()).await;
    }
}

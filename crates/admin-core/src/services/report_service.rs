// ============================================================================
// Admin Core - Report Service
// File: crates/admin-core/src/services/report_service.rs
// Description: Report moderation, map features and dashboard counters
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use admin_shared::{Page, Pagination};

use super::{Actor, AuditService};
use crate::domain::{to_feature_collection, NewActivity, Report, ReportStats, ReportStatus};
use crate::error::DomainError;
use crate::filter::{apply, Filter, ReportFilter};
use crate::repositories::{ProfileRepository, ReportRepository};

const ENTITY: &str = "reporte";

pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    profiles: Arc<dyn ProfileRepository>,
    audit: AuditService,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>, profiles: Arc<dyn ProfileRepository>, audit: AuditService) -> Self {
        Self { reports, profiles, audit }
    }

    pub async fn list(&self, filter: &ReportFilter, pagination: &Pagination) -> Result<Page<Report>, DomainError> {
        let reports = self.reports.list().await?;
        Ok(apply(reports, filter, pagination))
    }

    pub async fn get(&self, id: &Uuid) -> Result<Report, DomainError> {
        self.reports
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ReportNotFound(*id))
    }

    /// GeoJSON for the map. Reports without a usable location are left out.
    pub async fn map_features(&self, filter: &ReportFilter) -> Result<Value, DomainError> {
        let reports: Vec<Report> = self
            .reports
            .list()
            .await?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        Ok(to_feature_collection(&reports))
    }

    pub async fn stats(&self) -> Result<ReportStats, DomainError> {
        let reports = self.reports.list().await?;
        Ok(ReportStats::from_reports(&reports))
    }

    pub async fn change_status(&self, actor: &Actor, id: &Uuid, estado: ReportStatus) -> Result<Report, DomainError> {
        let current = self.get(id).await?;
        if !current.estado.can_transition_to(estado) {
            warn!(
                "Rejected status change of report {}: {} -> {}",
                id,
                current.estado.as_str(),
                estado.as_str()
            );
            return Err(DomainError::InvalidStatusTransition {
                from: current.estado.as_str(),
                to: estado.as_str(),
            });
        }

        let updated = self.reports.update_status(id, estado).await?;
        info!("Report {} status: {} -> {}", id, current.estado.as_str(), estado.as_str());

        self.audit
            .record(
                NewActivity::builder("cambiar_estado", ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(id)
                    .descripcion(format!("Reporte \"{}\" pasó a {}", updated.titulo, estado.label()))
                    .metadata("anterior", current.estado.as_str())
                    .metadata("nuevo", estado.as_str())
                    .build(),
            )
            .await;

        Ok(updated)
    }

    /// Assigns the report to an active user, or clears the assignment.
    pub async fn assign(&self, actor: &Actor, id: &Uuid, asignado_a: Option<Uuid>) -> Result<Report, DomainError> {
        self.get(id).await?;

        if let Some(user_id) = asignado_a {
            let assignee = self.profiles.find_by_id(&user_id).await?;
            if !assignee.is_some_and(|p| p.activo) {
                warn!("Rejected assignment of report {} to {}", id, user_id);
                return Err(DomainError::InvalidAssignee(user_id));
            }
        }

        let updated = self.reports.assign(id, asignado_a).await?;
        info!("Report {} assigned to {:?}", id, asignado_a);

        let mut activity = NewActivity::builder("asignar", ENTITY)
            .usuario(actor.id, actor.email.clone())
            .entidad_id(id)
            .descripcion(format!("Reporte \"{}\" {}", updated.titulo, if asignado_a.is_some() { "asignado" } else { "sin asignar" }));
        if let Some(user_id) = asignado_a {
            activity = activity.metadata("asignado_a", user_id.to_string());
        }
        self.audit.record(activity.build()).await;

        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: &Uuid) -> Result<(), DomainError> {
        let current = self.get(id).await?;
        self.reports.delete(id).await?;
        info!("Report deleted: {}", id);

        self.audit
            .record(
                NewActivity::builder("eliminar", ENTITY)
                    .usuario(actor.id, actor.email.clone())
                    .entidad_id(id)
                    .descripcion(format!("Reporte \"{}\" eliminado", current.titulo))
                    .build(),
            )
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::sample_profile;
    use crate::domain::report::sample_report;
    use crate::domain::BoundingBox;
    use crate::repositories::{MockAuditRepository, MockProfileRepository, MockReportRepository};

    fn audit() -> AuditService {
        let mut repo = MockAuditRepository::new();
        repo.expect_record().returning(|_| Ok(()));
        AuditService::new(Arc::new(repo))
    }

    fn actor() -> Actor {
        Actor::new(Uuid::new_v4(), "admin@example.com")
    }

    fn with_report(report: Report) -> MockReportRepository {
        let mut repo = MockReportRepository::new();
        repo.expect_find_by_id().returning(move |_| Ok(Some(report.clone())));
        repo
    }

    #[tokio::test]
    async fn test_terminal_status_only_reopens() {
        let mut report = sample_report("Bache", None, None);
        report.estado = ReportStatus::Resuelto;
        let id = report.id;

        let mut repo = with_report(report);
        repo.expect_update_status()
            .withf(|_, estado| *estado == ReportStatus::Pendiente)
            .times(1)
            .returning(|_, estado| {
                let mut r = sample_report("Bache", None, None);
                r.estado = estado;
                Ok(r)
            });

        let service = ReportService::new(Arc::new(repo), Arc::new(MockProfileRepository::new()), audit());

        let err = service.change_status(&actor(), &id, ReportStatus::EnProceso).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidStatusTransition { from: "resuelto", to: "en_proceso" }
        ));

        let reopened = service.change_status(&actor(), &id, ReportStatus::Pendiente).await.unwrap();
        assert_eq!(reopened.estado, ReportStatus::Pendiente);
    }

    #[tokio::test]
    async fn test_assign_requires_active_user() {
        let report = sample_report("Luminaria", None, None);
        let id = report.id;
        let mut inactive = sample_profile("luis@example.com", None);
        inactive.activo = false;
        let inactive_id = inactive.id;

        let mut repo = with_report(report);
        repo.expect_assign().withf(|_, a| a.is_none()).times(1).returning(|_, _| Ok(sample_report("Luminaria", None, None)));

        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_id().returning(move |_| Ok(Some(inactive.clone())));

        let service = ReportService::new(Arc::new(repo), Arc::new(profiles), audit());
        let err = service.assign(&actor(), &id, Some(inactive_id)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidAssignee(u) if u == inactive_id));

        assert!(service.assign(&actor(), &id, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_map_features_respect_bbox() {
        let mut repo = MockReportRepository::new();
        repo.expect_list().returning(|| {
            Ok(vec![
                sample_report("Centro", Some(19.43), Some(-99.13)),
                sample_report("Lejos", Some(25.67), Some(-100.31)),
                sample_report("Sin ubicación", None, None),
            ])
        });
        let service = ReportService::new(Arc::new(repo), Arc::new(MockProfileRepository::new()), audit());

        let filter = ReportFilter { bbox: BoundingBox::parse("-99.5,19.0,-98.9,19.8"), ..Default::default() };
        let geojson = service.map_features(&filter).await.unwrap();
        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["titulo"], "Centro");

        let all = service.map_features(&ReportFilter::default()).await.unwrap();
        assert_eq!(all["features"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_report() {
        let mut repo = MockReportRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();
        let service = ReportService::new(Arc::new(repo), Arc::new(MockProfileRepository::new()), audit());

        let id = Uuid::new_v4();
        assert!(matches!(service.delete(&actor(), &id).await, Err(DomainError::ReportNotFound(u)) if u == id));
    }
}

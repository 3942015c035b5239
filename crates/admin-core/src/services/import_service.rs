// ============================================================================
// Admin Core - Import Service
// File: crates/admin-core/src/services/import_service.rs
// Description: CSV bulk import of users and roles (template, preview, commit)
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use admin_security::file_digest;
use admin_shared::config::ImportSettings;

use super::{Actor, AuditService};
use crate::domain::{NewActivity, NewRole};
use crate::error::DomainError;
use crate::import::{
    read_csv, template_csv, validate_role_rows, validate_user_rows, BulkImporter, CreatedItem, ImportKind,
    ImportPreview, ImportReport, ImportedUser, RoleImportContext, UserImportContext,
};
use crate::repositories::{ProfileRepository, RoleRepository};

pub struct ImportService {
    profiles: Arc<dyn ProfileRepository>,
    roles: Arc<dyn RoleRepository>,
    audit: AuditService,
    settings: ImportSettings,
}

impl ImportService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        roles: Arc<dyn RoleRepository>,
        audit: AuditService,
        settings: ImportSettings,
    ) -> Self {
        Self { profiles, roles, audit, settings }
    }

    pub fn template(&self, kind: ImportKind) -> Result<String, DomainError> {
        template_csv(kind)
    }

    /// Validates an uploaded user file. Role names resolve to their ids for
    /// the commit step.
    async fn validate_users(
        &self,
        bytes: &[u8],
    ) -> Result<(ImportPreview<ImportedUser>, HashMap<String, Uuid>), DomainError> {
        let kind = ImportKind::Users;
        let table = read_csv(bytes, kind.required_columns(), kind.columns(), self.settings.max_rows)?;

        let existing = self.profiles.list().await?;
        let roles = self.roles.list().await?;
        let role_ids: HashMap<String, Uuid> = roles.iter().map(|r| (r.nombre.clone(), r.id)).collect();

        let ctx = UserImportContext::new(
            existing.into_iter().map(|p| p.email),
            roles.into_iter().map(|r| r.nombre),
            self.settings.default_user_role.clone(),
        );
        let rows = validate_user_rows(&table, &ctx);
        let preview = ImportPreview::new(kind, file_digest(bytes), table.warnings, rows);
        Ok((preview, role_ids))
    }

    async fn validate_roles(&self, bytes: &[u8]) -> Result<ImportPreview<NewRole>, DomainError> {
        let kind = ImportKind::Roles;
        let table = read_csv(bytes, kind.required_columns(), kind.columns(), self.settings.max_rows)?;

        let existing = self.roles.list().await?;
        let ctx = RoleImportContext::new(
            existing.into_iter().map(|r| r.nombre),
            self.settings.default_role_color.clone(),
        );
        let rows = validate_role_rows(&table, &ctx);
        Ok(ImportPreview::new(kind, file_digest(bytes), table.warnings, rows))
    }

    pub async fn preview_users(&self, bytes: &[u8]) -> Result<ImportPreview<ImportedUser>, DomainError> {
        let (preview, _) = self.validate_users(bytes).await?;
        info!(
            digest = %preview.file_digest,
            total = preview.summary.total,
            submittable = preview.summary.submittable(),
            invalid = preview.summary.invalid,
            "User import previewed"
        );
        Ok(preview)
    }

    pub async fn preview_roles(&self, bytes: &[u8]) -> Result<ImportPreview<NewRole>, DomainError> {
        let preview = self.validate_roles(bytes).await?;
        info!(
            digest = %preview.file_digest,
            total = preview.summary.total,
            submittable = preview.summary.submittable(),
            invalid = preview.summary.invalid,
            "Role import previewed"
        );
        Ok(preview)
    }

    /// Revalidates the file and creates every row that passes. Generated
    /// passwords are returned once, in the report.
    pub async fn commit_users(&self, actor: &Actor, bytes: &[u8]) -> Result<ImportReport, DomainError> {
        let (preview, role_ids) = self.validate_users(bytes).await?;
        let digest = preview.file_digest.clone();

        let report = BulkImporter::new(ImportKind::Users)
            .run(preview.rows, |imported: ImportedUser| {
                let profiles = Arc::clone(&self.profiles);
                let rol_id = role_ids.get(&imported.user.rol).copied();
                async move {
                    let rol_id = rol_id.ok_or_else(|| DomainError::RoleNotFound(imported.user.rol.clone()))?;
                    let profile = profiles.create(&imported.user, &rol_id).await?;
                    Ok::<_, DomainError>(CreatedItem {
                        id: profile.id.to_string(),
                        etiqueta: profile.email,
                        password_temporal: imported.password_generada.then_some(imported.user.password),
                    })
                }
            })
            .await;

        self.record_import(actor, ImportKind::Users, &digest, &report).await;
        Ok(report)
    }

    pub async fn commit_roles(&self, actor: &Actor, bytes: &[u8]) -> Result<ImportReport, DomainError> {
        let preview = self.validate_roles(bytes).await?;
        let digest = preview.file_digest.clone();

        let report = BulkImporter::new(ImportKind::Roles)
            .run(preview.rows, |role: NewRole| {
                let roles = Arc::clone(&self.roles);
                async move {
                    let created = roles.create(&role).await?;
                    Ok::<_, DomainError>(CreatedItem {
                        id: created.id.to_string(),
                        etiqueta: created.nombre,
                        password_temporal: None,
                    })
                }
            })
            .await;

        self.record_import(actor, ImportKind::Roles, &digest, &report).await;
        Ok(report)
    }

    async fn record_import(&self, actor: &Actor, kind: ImportKind, digest: &str, report: &ImportReport) {
        self.audit
            .record(
                NewActivity::builder("importar", kind.table())
                    .usuario(actor.id, actor.email.clone())
                    .descripcion(format!(
                        "Importación de {}: {} creados, {} fallidos, {} omitidos",
                        kind.as_str(),
                        report.created_count(),
                        report.failed_count(),
                        report.skipped
                    ))
                    .metadata("archivo_sha256", digest)
                    .metadata("creados", report.created_count())
                    .metadata("fallidos", report.failed_count())
                    .metadata("omitidos", report.skipped)
                    .build(),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::sample_profile;
    use crate::domain::role::sample_role;
    use crate::import::RowStatus;
    use crate::repositories::{MockAuditRepository, MockProfileRepository, MockRoleRepository};

    fn actor() -> Actor {
        Actor::new(Uuid::new_v4(), "admin@example.com")
    }

    fn roles_repo() -> MockRoleRepository {
        let mut roles = MockRoleRepository::new();
        roles
            .expect_list()
            .returning(|| Ok(vec![sample_role("usuario", vec![]), sample_role("Supervisor", vec![])]));
        roles
    }

    #[tokio::test]
    async fn test_preview_users_flags_existing_emails() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_list()
            .returning(|| Ok(vec![sample_profile("ana@example.com", Some("usuario"))]));

        let service = ImportService::new(
            Arc::new(profiles),
            Arc::new(roles_repo()),
            AuditService::new(Arc::new(MockAuditRepository::new())),
            ImportSettings::default(),
        );

        let csv = "email,rol\nana@example.com,usuario\nluis@example.com,\n";
        let preview = service.preview_users(csv.as_bytes()).await.unwrap();
        assert_eq!(preview.file_digest.len(), 64);
        assert_eq!(preview.rows[0].status, RowStatus::Invalid);
        assert_eq!(preview.rows[1].record.as_ref().unwrap().user.rol, "usuario");
        assert_eq!(preview.summary.submittable(), 1);
    }

    #[tokio::test]
    async fn test_commit_users_reports_generated_passwords_and_failures() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_list().returning(|| Ok(vec![]));
        profiles.expect_create().times(2).returning(|user, _| {
            if user.email == "falla@example.com" {
                Err(DomainError::BackendError("auth user already registered".to_string()))
            } else {
                Ok(sample_profile(&user.email, Some("usuario")))
            }
        });

        let mut audit = MockAuditRepository::new();
        audit
            .expect_record()
            .withf(|a| a.accion == "importar" && a.entidad == "profiles")
            .times(1)
            .returning(|_| Ok(()));

        let service = ImportService::new(
            Arc::new(profiles),
            Arc::new(roles_repo()),
            AuditService::new(Arc::new(audit)),
            ImportSettings::default(),
        );

        let csv = "email,password,rol\n\
                   nuevo@example.com,,supervisor\n\
                   falla@example.com,,\n\
                   malo,,\n";
        let report = service.commit_users(&actor(), csv.as_bytes()).await.unwrap();

        assert_eq!(report.total, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.created[0].item.etiqueta, "nuevo@example.com");
        assert_eq!(report.created[0].item.password_temporal.as_ref().map(String::len), Some(14));
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].line, 3);
    }

    #[tokio::test]
    async fn test_commit_roles() {
        let mut roles = MockRoleRepository::new();
        roles.expect_list().returning(|| Ok(vec![sample_role("Supervisor", vec![])]));
        roles
            .expect_create()
            .times(1)
            .returning(|r| Ok(sample_role(&r.nombre, r.permisos.clone())));

        let mut audit = MockAuditRepository::new();
        audit.expect_record().returning(|_| Ok(()));

        let service = ImportService::new(
            Arc::new(MockProfileRepository::new()),
            Arc::new(roles),
            AuditService::new(Arc::new(audit)),
            ImportSettings::default(),
        );

        let csv = "nombre,permisos\nSupervisor,ver_mapa\nCapturista,crear_reportes\n";
        let report = service.commit_roles(&actor(), csv.as_bytes()).await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.created[0].item.etiqueta, "Capturista");
        assert!(report.created[0].item.password_temporal.is_none());
    }

    #[tokio::test]
    async fn test_file_level_errors() {
        let service = ImportService::new(
            Arc::new(MockProfileRepository::new()),
            Arc::new(MockRoleRepository::new()),
            AuditService::new(Arc::new(MockAuditRepository::new())),
            ImportSettings::default(),
        );
        let err = service.preview_roles(b"descripcion\nsin nombre\n").await.unwrap_err();
        assert!(matches!(err, DomainError::ImportError(_)));
        assert!(service.template(ImportKind::Roles).unwrap().starts_with("nombre,descripcion,color,permisos,activo"));
    }
}

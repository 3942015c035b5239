//! Shared application state

use std::sync::Arc;

use admin_core::repositories::{AuditRepository, ProfileRepository, ReportRepository, RoleRepository};
use admin_core::services::{AuditService, ImportService, ReportService, RoleService, UserService};
use admin_infrastructure::{
    BackendAuditRepository, BackendClient, BackendProfileRepository, BackendReportRepository, BackendRoleRepository,
};
use admin_security::TokenVerifier;
use admin_shared::config::{AppConfig, ImportSettings};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub roles: Arc<RoleService>,
    pub reports: Arc<ReportService>,
    pub audit: Arc<AuditService>,
    pub imports: Arc<ImportService>,
    /// Profile lookups for the auth middleware.
    pub profiles: Arc<dyn ProfileRepository>,
    pub verifier: TokenVerifier,
    pub backend: Arc<BackendClient>,
    pub import_settings: ImportSettings,
}

impl AppState {
    /// Wires the backend adapters into the services.
    pub fn new(config: &AppConfig, backend: Arc<BackendClient>) -> Self {
        let profiles: Arc<dyn ProfileRepository> = Arc::new(BackendProfileRepository::new(backend.clone()));
        let roles: Arc<dyn RoleRepository> = Arc::new(BackendRoleRepository::new(backend.clone()));
        let reports: Arc<dyn ReportRepository> = Arc::new(BackendReportRepository::new(backend.clone()));
        let audit_repo: Arc<dyn AuditRepository> = Arc::new(BackendAuditRepository::new(backend.clone()));

        let audit = AuditService::new(audit_repo);

        Self {
            users: Arc::new(UserService::new(profiles.clone(), roles.clone(), audit.clone())),
            roles: Arc::new(RoleService::new(roles.clone(), profiles.clone(), audit.clone())),
            reports: Arc::new(ReportService::new(reports, profiles.clone(), audit.clone())),
            imports: Arc::new(ImportService::new(
                profiles.clone(),
                roles,
                audit.clone(),
                config.import.clone(),
            )),
            audit: Arc::new(audit),
            profiles,
            verifier: TokenVerifier::new(config.auth.jwt_secret.clone(), config.auth.jwt_audience.clone()),
            backend,
            import_settings: config.import.clone(),
        }
    }
}

//! Domain services (business logic)

pub mod audit_service;
pub mod user_service;
pub mod role_service;
pub mod report_service;
pub mod import_service;

use uuid::Uuid;

pub use audit_service::AuditService;
pub use import_service::ImportService;
pub use report_service::ReportService;
pub use role_service::RoleService;
pub use user_service::UserService;

/// Authenticated admin performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub email: String,
}

impl Actor {
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self { id, email: email.into() }
    }
}

//! Domain errors

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Report not found: {0}")]
    ReportNotFound(Uuid),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Role name already exists: {0}")]
    RoleNameAlreadyExists(String),

    #[error("Role '{0}' is a system role and cannot be modified this way")]
    ProtectedRole(String),

    #[error("Role '{nombre}' is still assigned to {users} user(s)")]
    RoleInUse { nombre: String, users: usize },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: &'static str, to: &'static str },

    #[error("Assignee is not an active user: {0}")]
    InvalidAssignee(Uuid),

    #[error("Operation not allowed on your own account")]
    SelfModification,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(crate::domain::validation_messages(&errors).join("; "))
    }
}

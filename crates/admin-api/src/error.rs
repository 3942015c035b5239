//! API errors and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use admin_core::error::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", m),
            ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, "FORBIDDEN", m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, "NOT_FOUND", m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", m),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, "CONFLICT", m),
            ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_TRANSITION", m),
            ApiError::Backend(m) => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", m),
            ApiError::InternalError(m) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", m),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        let message = e.to_string();
        match e {
            DomainError::UserNotFound(_) | DomainError::RoleNotFound(_) | DomainError::ReportNotFound(_) => {
                ApiError::NotFound(message)
            }
            DomainError::EmailAlreadyExists(_)
            | DomainError::RoleNameAlreadyExists(_)
            | DomainError::RoleInUse { .. } => ApiError::Conflict(message),
            DomainError::ProtectedRole(_) | DomainError::SelfModification => ApiError::Forbidden(message),
            DomainError::InvalidStatusTransition { .. } => ApiError::Unprocessable(message),
            DomainError::InvalidAssignee(_) | DomainError::ValidationError(_) | DomainError::ImportError(_) => {
                ApiError::BadRequest(message)
            }
            DomainError::BackendError(_) => ApiError::Backend(message),
            DomainError::InternalError(_) => ApiError::InternalError(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!("{}: {}", code, message);
        } else {
            tracing::warn!("{}: {}", code, message);
        }

        (status, Json(ApiResponse::<()>::error(code, message))).into_response()
    }
}

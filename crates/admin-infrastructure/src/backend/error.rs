//! Backend client errors

use thiserror::Error;

use admin_core::error::DomainError;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Unique-constraint violations and "already registered" auth errors.
    pub fn is_conflict(&self) -> bool {
        let BackendError::Status { message, .. } = self else {
            return false;
        };
        self.status() == Some(409)
            || message.contains("duplicate key")
            || message.to_lowercase().contains("already")
    }
}

impl From<BackendError> for DomainError {
    fn from(e: BackendError) -> Self {
        DomainError::BackendError(e.to_string())
    }
}

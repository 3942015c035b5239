//! # Admin Core
//!
//! Domain records, permission catalog, CSV import, audit diffs, list
//! filtering, repository ports and services for the reportes admin.

pub mod domain;
pub mod error;
pub mod filter;
pub mod import;
pub mod repositories;
pub mod services;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
pub use services::Actor;

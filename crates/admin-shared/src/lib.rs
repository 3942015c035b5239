//! # Admin Shared
//!
//! Shared configuration, telemetry, pagination types and small helpers for
//! the reportes admin application.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;

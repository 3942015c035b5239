//! # Admin Infrastructure
//!
//! HTTP adapters for the managed backend: a REST/RPC client and the
//! repository implementations built on it.

pub mod backend;
pub mod repositories;

pub use backend::{BackendClient, BackendError};
pub use repositories::{
    BackendAuditRepository, BackendProfileRepository, BackendReportRepository, BackendRoleRepository,
};

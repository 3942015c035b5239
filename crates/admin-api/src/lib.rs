//! # Admin API
//!
//! HTTP handlers, authentication middleware, DTOs and the router for the
//! reportes admin.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;

//! HTTP handlers

pub mod health;
pub mod session;
pub mod users;
pub mod roles;
pub mod reportes;
pub mod audit;
pub mod import;

//! Backend access over its REST and RPC endpoints

pub mod client;
pub mod error;

pub use client::{eq, BackendClient};
pub use error::BackendError;

//! # Admin Security
//!
//! Access-token verification, temporary passwords, password strength and
//! file digests.

pub mod jwt;
pub mod password;
pub mod digest;

pub use jwt::{AccessClaims, JwtError, TokenVerifier};
pub use password::{generate_temporary_password, password_strength, PasswordStrength};
pub use digest::file_digest;

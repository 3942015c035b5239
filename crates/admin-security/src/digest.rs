//! Content digests for uploaded files

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of the given bytes.
pub fn file_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

pub const DEFAULT_IMPORT_MAX_ROWS: usize = 500;
pub const DEFAULT_IMPORT_MAX_FILE_BYTES: usize = 1024 * 1024;
pub const DEFAULT_USER_ROLE: &str = "usuario";
pub const DEFAULT_ROLE_COLOR: &str = "#6B7280";

/// Separators accepted between permission names inside a single CSV cell.
pub const PERMISSION_SEPARATORS: [char; 2] = [';', '|'];

pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_JWT_AUDIENCE: &str = "authenticated";

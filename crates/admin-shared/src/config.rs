//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_BACKEND_TIMEOUT_SECS, DEFAULT_IMPORT_MAX_FILE_BYTES, DEFAULT_IMPORT_MAX_ROWS,
    DEFAULT_JWT_AUDIENCE, DEFAULT_ROLE_COLOR, DEFAULT_USER_ROLE,
};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub backend: BackendSettings,
    pub auth: AuthSettings,
    pub import: ImportSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Hosted backend (REST + RPC + auth admin) connection settings.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub url: String,
    pub service_role_key: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub jwt_audience: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImportSettings {
    pub max_rows: usize,
    pub max_file_bytes: usize,
    pub default_user_role: String,
    pub default_role_color: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_IMPORT_MAX_ROWS,
            max_file_bytes: DEFAULT_IMPORT_MAX_FILE_BYTES,
            default_user_role: DEFAULT_USER_ROLE.to_string(),
            default_role_color: DEFAULT_ROLE_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogSettings {
    pub directory: Option<String>,
    pub file_prefix: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("app.cors_origins")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }

    /// Builder pre-populated with every default value; sources added on top
    /// override them.
    pub fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "admin-server")?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("backend.timeout_seconds", DEFAULT_BACKEND_TIMEOUT_SECS)?
            .set_default("auth.jwt_audience", DEFAULT_JWT_AUDIENCE)?
            .set_default("import.max_rows", DEFAULT_IMPORT_MAX_ROWS as u64)?
            .set_default("import.max_file_bytes", DEFAULT_IMPORT_MAX_FILE_BYTES as u64)?
            .set_default("import.default_user_role", DEFAULT_USER_ROLE)?
            .set_default("import.default_role_color", DEFAULT_ROLE_COLOR)?
            .set_default("log.file_prefix", "admin-server")
    }
}

use std::path::PathBuf;

use serde::Deserialize;

use soundcave_auth_types::token::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
use soundcave_core::config::{Config, ConfigError};
use soundcave_core::tracing::LogFormat;

/// Signing secret used when `APP_ENV=development` and `JWT_SECRET` is unset.
pub const DEV_JWT_SECRET: &str = "soundcave-insecure-development-secret";

/// Deployment mode. Only development tolerates a missing signing secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    #[default]
    Production,
}

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    #[serde(default)]
    pub app_env: AppEnv,
    /// HMAC secret for access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: Option<String>,
    /// Access token lifetime (default 30 days).
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port for the HTTP server (default 6002).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Comma-separated allowed origins, or `*`.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
    /// Root directory of the local object store.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
    /// Public URL prefix for stored objects. A path prefix is also served by this process.
    #[serde(default = "default_asset_base_url")]
    pub asset_base_url: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

fn default_port() -> u16 {
    6002
}

fn default_cors_origins() -> String {
    "*".to_owned()
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_asset_base_url() -> String {
    "/assets".to_owned()
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Config for ApiConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.jwt_secret.as_deref() {
            Some("") => {
                return Err(ConfigError::Invalid("JWT_SECRET must not be empty".into()));
            }
            None if self.app_env == AppEnv::Production => {
                return Err(ConfigError::Invalid(
                    "JWT_SECRET is required outside development".into(),
                ));
            }
            _ => {}
        }
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&self.token_ttl_secs) {
            return Err(ConfigError::Invalid(format!(
                "TOKEN_TTL_SECS must be between 1 and {MAX_TOKEN_TTL_SECS}"
            )));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid(
                "BCRYPT_COST must be between 4 and 31".into(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "MAX_UPLOAD_BYTES must be positive".into(),
            ));
        }
        Ok(())
    }
}

impl ApiConfig {
    /// The configured signing secret, falling back to [`DEV_JWT_SECRET`].
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEV_JWT_SECRET)
    }

    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret.is_none()
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_format(&self) -> LogFormat {
        match self.app_env {
            AppEnv::Development => LogFormat::Compact,
            AppEnv::Production => LogFormat::Json,
        }
    }
}

//! Configuration file
//!
//! A single JSON object; every section and field is optional. The signing
//! secret may come from the `JWT_SECRET` environment variable instead, which
//! wins over the file.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::auth::{TokenConfig, DEFAULT_TOKEN_TTL_DAYS};
use crate::http_server::HttpServerConfig;
use crate::query::PaginationConfig;

use super::errors::{CliError, CliResult};

/// Environment variable overriding `auth.jwt_secret`
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret (required, from file or environment)
    #[serde(default)]
    pub jwt_secret: String,

    /// Token lifetime in days (default: 30)
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

fn default_token_ttl_days() -> i64 {
    DEFAULT_TOKEN_TTL_DAYS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_days: default_token_ttl_days(),
        }
    }
}

impl AuthConfig {
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig::new(self.jwt_secret.clone(), Duration::days(self.token_ttl_days))
    }
}

/// Process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub query: PaginationConfig,

    /// Directory holding `<collection>.json` seed files (default: "./data")
    #[serde(default = "default_seed_dir")]
    pub seed_dir: String,

    /// Log level when `RUST_LOG` is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_seed_dir() -> String {
    "./data".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            auth: AuthConfig::default(),
            query: PaginationConfig::default(),
            seed_dir: default_seed_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from `path` (or defaults), apply the environment, and validate
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_secret_override(std::env::var(JWT_SECRET_ENV).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file without validating it
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Replace the file secret with a non-empty environment value
    pub fn apply_secret_override(&mut self, secret: Option<String>) {
        if let Some(secret) = secret.filter(|s| !s.is_empty()) {
            self.auth.jwt_secret = secret;
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(CliError::config_error(format!(
                "auth.jwt_secret is empty; set it in the config file or via {JWT_SECRET_ENV}"
            )));
        }

        if self.auth.token_ttl_days <= 0 {
            return Err(CliError::config_error("auth.token_ttl_days must be > 0"));
        }

        if self.query.default_limit == 0 {
            return Err(CliError::config_error("query.default_limit must be > 0"));
        }

        if self.query.max_limit < self.query.default_limit {
            return Err(CliError::config_error(format!(
                "query.max_limit ({}) must be >= query.default_limit ({})",
                self.query.max_limit, self.query.default_limit
            )));
        }

        if self.seed_dir.trim().is_empty() {
            return Err(CliError::config_error("seed_dir must not be empty"));
        }

        Ok(())
    }

    /// Get seed directory as Path
    pub fn seed_path(&self) -> &Path {
        Path::new(&self.seed_dir)
    }
}

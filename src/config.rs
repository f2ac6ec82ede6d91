//! Configuration module for filedrop.

use serde::Deserialize;
use std::path::Path;

use crate::{FiledropError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public base URL used to build file URLs (no trailing slash).
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded files.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_upload_dir() -> String {
    "public/uploads".to_string()
}

fn default_max_file_size() -> u64 {
    500_000_000 // 500 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_file_size: default_max_file_size(),
        }
    }
}

/// Shared admin credentials for HTTP Basic authentication.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filedrop.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// File storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Admin credentials.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FiledropError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(s).map_err(|e| FiledropError::Config(format!("config parse error: {e}")))?;
        config.normalize();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `URL`: public base URL for returned file links
    /// - `PORT`: listen port
    /// - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: Basic auth credentials
    /// - `MAX_FILE_SIZE`: upload ceiling in bytes
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using the given variable lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(url) = get("URL") {
            self.server.public_url = url;
        }
        if let Some(port) = get("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
        if let Some(username) = get("ADMIN_USERNAME") {
            self.auth.username = username;
        }
        if let Some(password) = get("ADMIN_PASSWORD") {
            self.auth.password = password;
        }
        if let Some(size) = get("MAX_FILE_SIZE") {
            match size.parse() {
                Ok(size) => self.storage.max_file_size = size,
                Err(_) => tracing::warn!("Ignoring invalid MAX_FILE_SIZE value: {}", size),
            }
        }

        self.normalize();
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - `public_url` is not an absolute URL
    /// - either credential is empty
    /// - `max_file_size` is zero
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.server.public_url).map_err(|e| {
            FiledropError::Config(format!(
                "invalid public_url {:?}: {e}",
                self.server.public_url
            ))
        })?;

        if self.auth.username.is_empty() || self.auth.password.is_empty() {
            return Err(FiledropError::Config(
                "admin username and password must be set. \
                 Set them in config.toml or via ADMIN_USERNAME / ADMIN_PASSWORD."
                    .to_string(),
            ));
        }

        if self.storage.max_file_size == 0 {
            return Err(FiledropError::Config(
                "max_file_size must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    fn normalize(&mut self) {
        let trimmed = self.server.public_url.trim_end_matches('/').len();
        self.server.public_url.truncate(trimmed);
    }
}

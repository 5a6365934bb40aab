//! Configuration module for Pantry.
//!
//! Settings come from a TOML file with per-field defaults; a handful of
//! `PANTRY_*` environment variables override the file, which mirrors how the
//! service is deployed (secrets are injected through the environment).

use std::path::Path;

use serde::Deserialize;

use crate::{PantryError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/pantry.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob storage configuration (uploaded recipe images).
#[derive(Debug, Clone, Deserialize)]
pub struct BlobsConfig {
    /// Base directory for stored blobs.
    #[serde(default = "default_blobs_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_blobs_path() -> String {
    "data/blobs".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl Default for BlobsConfig {
    fn default() -> Self {
        Self {
            path: default_blobs_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// Secret key for session token signing.
    ///
    /// When empty, a random per-process key is generated at startup and all
    /// outstanding sessions become invalid on restart.
    #[serde(default)]
    pub secret_key: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional path to a log file; console-only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub blobs: BlobsConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config =
            toml::from_str(&content).map_err(|e| PantryError::Config(e.to_string()))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string (no environment overrides).
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PantryError::Config(e.to_string()))
    }

    /// Apply `PANTRY_*` environment variable overrides.
    ///
    /// Environment values take priority over the file, matching the
    /// deployment convention of injecting secrets via the environment.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PANTRY_SECRET_KEY") {
            self.auth.secret_key = key;
        }
        if let Ok(path) = std::env::var("PANTRY_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Ok(path) = std::env::var("PANTRY_BLOBS_PATH") {
            self.blobs.path = path;
        }
        if let Ok(port) = std::env::var("PANTRY_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }
}

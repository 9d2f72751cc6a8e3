//! Configuration module for filegate.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::{GatewayError, Result};

/// Environment variable naming the config file to load.
pub const CONFIG_PATH_ENV: &str = "FILEGATE_CONFIG";

/// Environment variable overriding the listening port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable overriding the storage root (persistent volume mount).
pub const STORAGE_PATH_ENV: &str = "RAILWAY_VOLUME_MOUNT_PATH";

/// Default config file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Directory name used next to the executable when no storage path is configured.
const DEFAULT_STORAGE_DIR: &str = "files";

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
    "::".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Path to the storage root. Falls back to `files/` next to the executable.
    #[serde(default)]
    pub storage_path: Option<String>,
    /// Maximum upload request size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

/// Default maximum upload request size in megabytes.
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: u64 = 100;

fn default_max_upload_size() -> u64 {
    DEFAULT_MAX_UPLOAD_SIZE_MB
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

impl FilesConfig {
    /// Resolve the storage root.
    ///
    /// Called once at startup; the result is handed to the file store and
    /// never recomputed.
    pub fn resolve_storage_root(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage_path {
            return Ok(PathBuf::from(path));
        }

        let exe = std::env::current_exe()?;
        let dir = exe.parent().ok_or_else(|| {
            GatewayError::Config(format!(
                "executable path has no parent directory: {}",
                exe.display()
            ))
        })?;

        Ok(dir.join(DEFAULT_STORAGE_DIR))
    }

    /// Maximum upload request size in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_size_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional path to a log file, written in addition to stdout.
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
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GatewayError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file if it exists, otherwise use defaults,
    /// then apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GatewayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: Override the listening port
    /// - `RAILWAY_VOLUME_MOUNT_PATH`: Override the storage root
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using the given variable lookup.
    ///
    /// Empty values are ignored. An unparsable `PORT` is logged and ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV).filter(|v| !v.is_empty()) {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid {} value", PORT_ENV),
            }
        }

        if let Some(path) = lookup(STORAGE_PATH_ENV).filter(|v| !v.is_empty()) {
            self.files.storage_path = Some(path);
        }
    }
}

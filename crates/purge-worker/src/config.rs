//! Worker configuration.
//!
//! Everything the invalidators need is carried here and handed to them at
//! construction; nothing is read from process-global state.

use std::path::{Path, PathBuf};

use purge_protocol::{PROTOCOL_MAX, PROTOCOL_MIN};
use serde::{Deserialize, Serialize};

use crate::guard::AccessPolicy;

/// Where the web server keeps its FastCGI cache by default.
pub const DEFAULT_CACHE_ROOT: &str = "/var/www/html/wp-content/cache/fastcgi";

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Worker configuration settings.
///
/// There is no object cache setting: a store that outlives the process has
/// to be injected with [`ControlSurface::with_object_cache`](crate::ControlSurface::with_object_cache).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Minimum supported protocol version.
    pub protocol_min: i32,
    /// Maximum supported protocol version.
    pub protocol_max: i32,
    /// Root of the FastCGI cache tree.
    pub cache_root: PathBuf,
    /// Who may invoke operations.
    pub access: AccessPolicy,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            protocol_min: PROTOCOL_MIN,
            protocol_max: PROTOCOL_MAX,
            cache_root: PathBuf::from(DEFAULT_CACHE_ROOT),
            access: AccessPolicy::default(),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: WorkerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "cache_root".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        // A purge empties everything below the root.
        if self.cache_root.parent().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "cache_root".to_string(),
                reason: format!("refusing to use '{}' as a cache root", self.cache_root.display()),
            });
        }

        if self.protocol_min > self.protocol_max {
            return Err(ConfigError::InvalidValue {
                field: "protocol_min".to_string(),
                reason: format!(
                    "{} is greater than protocol_max {}",
                    self.protocol_min, self.protocol_max
                ),
            });
        }

        Ok(())
    }
}

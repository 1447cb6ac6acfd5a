//! Operator configuration
//!
//! Resolved in layers, later layers winning:
//! 1. Built-in defaults
//! 2. TOML file (`--config`, `$FCGI_PURGE_CONFIG`, or `/etc/fcgi-purge/config.toml`)
//! 3. CLI flags

use std::path::{Path, PathBuf};

use purge_worker::{ConfigError, WorkerConfig};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "FCGI_PURGE_CONFIG";

/// Config file consulted when nothing else is given. Optional.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/fcgi-purge/config.toml";

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Builtin,
    File(PathBuf),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// `[log]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// trace | debug | info | warn | error
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Full operator configuration: the worker settings plus CLI-only values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    #[serde(flatten)]
    pub worker: WorkerConfig,
    /// Principal the CLI acts as when it signs requests.
    pub principal: String,
    pub log: LogConfig,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            worker: WorkerConfig::default(),
            principal: "admin".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl PurgeConfig {
    /// Parse from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: PurgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file that must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Resolve the config file and load it.
    ///
    /// An explicit path or `$FCGI_PURGE_CONFIG` must point at an existing
    /// file. The default path is optional; without it the built-in
    /// defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, ConfigSource), ConfigError> {
        let requested = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        if let Some(path) = requested {
            let config = Self::from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            let config = Self::from_file(&default_path)?;
            return Ok((config, ConfigSource::File(default_path)));
        }

        Ok((Self::default(), ConfigSource::Builtin))
    }

    /// Apply CLI flag overrides.
    pub fn with_overrides(mut self, cache_root: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(root) = cache_root {
            self.worker.cache_root = root;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.worker.validate()?;

        if self.principal.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "principal".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "log.level".to_string(),
                reason: format!("expected one of {}", LEVELS.join(", ")),
            });
        }

        Ok(())
    }
}

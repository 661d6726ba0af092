use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;
use crate::storage::is_valid_key;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/mealdeck/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("mealdeck").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The source has a base URL and at least one partition
    /// - Page size and request concurrency are non-zero
    /// - The storage namespace is usable as a slot key
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |message: String| Err(ConfigError::ValidationError { message });

        if self.source.base_url.trim().is_empty() {
            return fail("source.base_url must not be empty".to_string());
        }

        if self.source.partition_param.trim().is_empty() {
            return fail("source.partition_param must not be empty".to_string());
        }

        if self.source.partitions.is_empty() {
            return fail("At least one source partition must be configured".to_string());
        }

        if let Some(blank) = self.source.partitions.iter().position(|p| p.trim().is_empty()) {
            return fail(format!("source.partitions[{}] is blank", blank));
        }

        if self.source.max_concurrent_requests == 0 {
            return fail("source.max_concurrent_requests must be at least 1".to_string());
        }

        if self.view.page_size == 0 {
            return fail("view.page_size must be at least 1".to_string());
        }

        if !is_valid_key(&self.storage.namespace) {
            return fail(format!(
                "storage.namespace '{}' may only contain letters, digits, '.', '_' and '-'",
                self.storage.namespace
            ));
        }

        Ok(())
    }
}

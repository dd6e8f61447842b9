//! Layered configuration for a migration run.
//!
//! Sources, lowest precedence first: built-in defaults, an optional YAML
//! file, then command-line flags (which fall back to environment
//! variables and `.env`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::store::DirLayout;

/// Default base URL of the work-order API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One layer of optional settings. Unset fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    /// Base URL of the work-order API.
    pub api_base_url: Option<String>,
    /// Key sent as `X-Api-Key`.
    pub api_key: Option<String>,
    /// Directory scanned for candidate CSV files.
    pub input_dir: Option<PathBuf>,
    /// Directory receiving fully migrated files.
    pub processed_dir: Option<PathBuf>,
    /// Directory receiving failed files.
    pub error_dir: Option<PathBuf>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl ConfigLayer {
    /// Reads a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Returns this layer with every field set in `higher` taking its place.
    #[must_use]
    pub fn overlay(self, higher: Self) -> Self {
        Self {
            api_base_url: higher.api_base_url.or(self.api_base_url),
            api_key: higher.api_key.or(self.api_key),
            input_dir: higher.input_dir.or(self.input_dir),
            processed_dir: higher.processed_dir.or(self.processed_dir),
            error_dir: higher.error_dir.or(self.error_dir),
            request_timeout_secs: higher.request_timeout_secs.or(self.request_timeout_secs),
        }
    }
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Base URL of the work-order API, without a trailing slash.
    pub api_base_url: String,
    /// Key sent as `X-Api-Key`. Never empty.
    pub api_key: String,
    /// Input, processed and error directories.
    pub dirs: DirLayout,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl MigrationConfig {
    /// Loads the optional YAML file and applies `overrides` on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or required settings are missing.
    pub fn load(file: Option<&Path>, overrides: ConfigLayer) -> Result<Self, ConfigError> {
        let base = match file {
            Some(path) => ConfigLayer::from_yaml_file(path)?,
            None => ConfigLayer::default(),
        };
        Self::resolve(base.overlay(overrides))
    }

    /// Fills unset fields with defaults and checks required ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the base URL is empty.
    pub fn resolve(layer: ConfigLayer) -> Result<Self, ConfigError> {
        let api_key = layer
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let api_base_url = layer
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if api_base_url.is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }

        let defaults = DirLayout::default();
        Ok(Self {
            api_base_url,
            api_key,
            dirs: DirLayout {
                input: layer.input_dir.unwrap_or(defaults.input),
                processed: layer.processed_dir.unwrap_or(defaults.processed),
                error: layer.error_dir.unwrap_or(defaults.error),
            },
            request_timeout: Duration::from_secs(
                layer.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

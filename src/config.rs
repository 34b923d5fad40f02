/// Service configuration loader - parses surfsup.toml
///
/// Keeps the anchor date, window length and endpoint settings out of the
/// code so a refreshed dataset or a different port does not need a rebuild.
/// Every key has a default; a missing file yields the defaults.

use crate::query::QuerySettings;
use crate::window::{self, DEFAULT_WINDOW_DAYS};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "surfsup.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// TOML Configuration Structures
// ---------------------------------------------------------------------------

/// Root of surfsup.toml
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub dataset: DatasetConfig,
    pub endpoint: EndpointConfig,
    pub database: DatabaseConfig,
}

/// `[dataset]` - rolling window parameters
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetConfig {
    /// Date treated as the most recent observation ("YYYY-MM-DD").
    pub anchor_date: NaiveDate,
    pub window_days: u32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            anchor_date: window::default_anchor(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// `[endpoint]` - HTTP server settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    pub port: u16,
    /// Worker threads handling requests.
    pub workers: usize,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            workers: 4,
        }
    }
}

/// `[database]` - backing store location. `DATABASE_URL` takes precedence.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl ServiceConfig {
    /// Parses and validates a configuration document.
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.window_days == 0 {
            return Err(ConfigError::Invalid(
                "dataset.window_days must be at least 1".to_string(),
            ));
        }
        if self.endpoint.workers == 0 {
            return Err(ConfigError::Invalid(
                "endpoint.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn query_settings(&self) -> QuerySettings {
        QuerySettings {
            anchor_date: self.dataset.anchor_date,
            window_days: self.dataset.window_days,
        }
    }
}

/// Loads configuration from `path`.
///
/// A missing file is not an error: the defaults are returned and a warning
/// is logged. An unreadable or malformed file is.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<ServiceConfig, ConfigError> {
    let path = path.as_ref();

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("{} not found, using default configuration", path.display());
            return Ok(ServiceConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config = ServiceConfig::from_toml_str(&contents, path)?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Loads `surfsup.toml` from the working directory.
pub fn load_config() -> Result<ServiceConfig, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH)
}

//! # Configuration
//!
//! Application configuration loaded once at startup.
//!
//! ## Configuration Sources (later wins)
//! 1. Defaults (this file)
//! 2. Config file (`--config PATH`, or `till.toml` in the platform config dir)
//! 3. Environment variables (`TILL_*`)
//! 4. Command line flags (`--data-dir`)
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "THE CAKE SHOP"
//! currency_symbol = "Rs."
//!
//! [storage]
//! data_dir = "."
//! ```
//!
//! ## Thread Safety
//! Configuration is read-only after loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use till_core::pricing;
use till_store::StoreConfig;

/// Config file name inside the platform config directory.
pub const CONFIG_FILE: &str = "till.toml";

/// Configuration load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub storage: StorageSettings,
}

/// What gets printed on bills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Store name (bill banner).
    pub name: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: "THE CAKE SHOP".to_string(),
            currency_symbol: "Rs.".to_string(),
        }
    }
}

/// Where files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Parent of `Bills/` and `TaxFiles/`.
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file and environment.
    ///
    /// A missing file is not an error; an unreadable or unparseable one is.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "Loading config file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                AppConfig::default()
            }
            None => AppConfig::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `TILL_STORE_NAME`, `TILL_CURRENCY_SYMBOL` and `TILL_DATA_DIR`.
    ///
    /// `lookup` returns the value of a variable, if set.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("TILL_STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Some(symbol) = lookup("TILL_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        if let Some(dir) = lookup("TILL_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.storage.data_dir = PathBuf::from(dir);
        }
    }

    /// Replaces the data directory when a flag was given.
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.storage.data_dir = dir;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store name cannot be empty".into()));
        }

        Ok(())
    }

    /// Storage layout rooted at the data directory.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.storage.data_dir.clone())
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use till_cli::state::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(27.0), "Rs.27.00");
    /// ```
    pub fn format_currency(&self, amount: f64) -> String {
        pricing::format_currency(&self.store.currency_symbol, amount)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "till")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }
}

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{MaterialMatch, SortOrder};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remnant table settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// CSV file holding the table (defaults to the data directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Catalog ordering when none is given on the command line
    #[serde(default)]
    pub default_sort: SortOrder,

    /// How the material filter compares values
    #[serde(default)]
    pub material_match: MaterialMatch,
}

impl StoreConfig {
    /// Configured data file, or `stockremnant.csv` under `data_dir`
    pub fn data_file_or(&self, data_dir: &Path) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| data_dir.join(DEFAULT_DATA_FILE))
    }
}

pub const DEFAULT_DATA_FILE: &str = "stockremnant.csv";

/// Remote image settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Fetch each catalog image on its own thread
    #[serde(default)]
    pub concurrent_fetch: bool,
}

impl ImageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            timeout_secs: default_timeout_secs(),
            concurrent_fetch: false,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write a rotating log file in the data directory
    #[serde(default)]
    pub file_enabled: bool,

    #[serde(default = "default_file_level")]
    pub file_level: String,

    /// Records at or above this level are echoed to stderr
    #[serde(default = "default_console_level")]
    pub console_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file_enabled: false,
            file_level: default_file_level(),
            console_level: default_console_level(),
        }
    }
}

// Default value functions for serde
fn default_timeout_secs() -> u64 {
    5
}

fn default_file_level() -> String {
    "info".to_string()
}

fn default_console_level() -> String {
    "warn".to_string()
}

/// Trait for configuration storage
///
/// Runs before the logger is installed, so implementations report what
/// they did through return values instead of logging.
pub trait ConfigStorage: Send + Sync {
    /// Load configuration from file, or defaults when the file is missing
    fn load(&self) -> Result<Config>;

    /// Get the config file path
    fn path(&self) -> &Path;

    /// Write the bundled example config if no file exists yet
    /// Returns true when a file was written
    fn create_default(&self) -> Result<bool>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        use anyhow::Context;
        use std::fs;

        if !self.path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn create_default(&self) -> Result<bool> {
        use anyhow::Context;
        use std::fs;

        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        // Use the example config compiled into the binary
        let example_config = include_str!("../../remnant-stock.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        Ok(true)
    }
}

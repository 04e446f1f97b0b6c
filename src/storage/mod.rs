pub mod config;
pub mod inventory;
pub mod repository;

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use config::{
    Config, ConfigStorage, DEFAULT_DATA_FILE, ImageConfig, LoggingConfig, StoreConfig,
    TomlConfigStorage,
};
pub use inventory::{CsvInventoryStorage, InventoryStorage};
pub use repository::RemnantRepository;

const APP_DIR: &str = "remnant-stock";

/// Ensure XDG data and config directories exist
/// Returns (data_dir, config_dir)
///
/// XDG Base Directory Specification:
/// - Data: $XDG_DATA_HOME/remnant-stock (default: ~/.local/share/remnant-stock)
/// - Config: $XDG_CONFIG_HOME/remnant-stock (default: ~/.config/remnant-stock)
pub fn ensure_directories() -> Result<(PathBuf, PathBuf)> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    let home_path = PathBuf::from(home);

    let data_dir = if let Ok(xdg_data) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join(APP_DIR)
    } else {
        home_path.join(".local/share").join(APP_DIR)
    };

    let config_dir = if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join(APP_DIR)
    } else {
        home_path.join(".config").join(APP_DIR)
    };

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

    Ok((data_dir, config_dir))
}

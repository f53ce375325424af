//! YAML configuration loading and saving
//!
//! Missing or broken config files never stop the game from starting: loading
//! falls back to defaults and says so in the log.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Load configuration from a YAML file
///
/// Returns `T::default()` when the file does not exist or cannot be
/// read/parsed. Fields missing from the file take their defaults when `T`
/// is `#[serde(default)]`.
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        log::info!("load_config: {:?} not found, using defaults", path);
        return T::default();
    }

    match read_config(path) {
        Ok(config) => {
            log::info!("load_config: loaded {:?}", path);
            config
        }
        Err(e) => {
            log::warn!("load_config: {:#}, using defaults", e);
            T::default()
        }
    }
}

fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse config file {:?}", path))
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;
    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    log::info!("save_config: saved {:?}", path);
    Ok(())
}

//! Path utilities for configuration files

use std::path::PathBuf;

/// Get the default configuration directory
///
/// Returns: `<platform config dir>/stem-audio` (e.g. `~/.config/stem-audio`),
/// falling back to `./stem-audio` when the platform has no config dir.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stem-audio")
}

/// Get the default path for a config file
///
/// # Arguments
/// * `filename` - Config file name (e.g., "audio.yaml")
pub fn default_config_path(filename: &str) -> PathBuf {
    default_config_dir().join(filename)
}

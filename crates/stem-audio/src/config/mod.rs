//! Audio configuration
//!
//! Process-wide settings consumed by stem channels:
//!
//! - Playback buffer compensation and whammy pitch-shift settings
//! - Reverb effect chain, volume multiplier and fade durations
//! - Per-category stem volumes and the minimum stem volume policy
//! - Generic YAML config loading/saving
//!
//! # Usage
//!
//! ```ignore
//! use stem_audio::config::{default_config_path, load_config, AudioSettings, SharedSettings};
//!
//! let path = default_config_path("audio.yaml");
//! let settings = SharedSettings::new(load_config::<AudioSettings>(&path));
//!
//! // Volume slider moved in the settings menu
//! settings.update(|s| s.volumes.drums = 0.8);
//! settings.save(&path)?;
//! ```

mod io;
mod paths;
mod settings;
mod shared;

pub use io::{load_config, save_config};
pub use paths::{default_config_dir, default_config_path};
pub use settings::{
    AudioSettings, ReverbSettings, StemVolumes, WhammySettings, DEFAULT_MINIMUM_STEM_VOLUME,
    DEFAULT_PLAYBACK_BUFFER_LENGTH,
};
pub use shared::SharedSettings;

//! Audio settings consumed by stem channels

use serde::{Deserialize, Serialize};

use crate::backend::{EqBand, PitchShiftParams, ReverbParams, DEFAULT_FFT_SIZE, DEFAULT_OVERSAMPLING};
use crate::types::{Stem, VolumeCategory};

/// Default playback buffer length in seconds
///
/// Seeks are pushed forward by this amount so that the audio leaving the
/// buffer lines up with the requested position.
pub const DEFAULT_PLAYBACK_BUFFER_LENGTH: f64 = 0.075;

/// Default floor for the effective stem volume when the minimum volume
/// policy is enabled
pub const DEFAULT_MINIMUM_STEM_VOLUME: f64 = 0.15;

/// Top-level audio settings
///
/// Loaded from YAML with [`crate::config::load_config`]; every field has a
/// default so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Playback buffer length in seconds, added to compensated seeks
    pub playback_buffer_length: f64,

    /// Whammy pitch-bend settings
    pub whammy: WhammySettings,

    /// Star power reverb settings
    pub reverb: ReverbSettings,

    /// Keep stems audible: raise effective stem volume to
    /// `minimum_stem_volume` instead of letting it drop to silence
    pub use_minimum_stem_volume: bool,

    /// Floor applied when `use_minimum_stem_volume` is set
    pub minimum_stem_volume: f64,

    /// Change pitch along with playback speed (chipmunk effect)
    pub shift_pitch_with_speed: bool,

    /// Per-category volume sliders
    pub volumes: StemVolumes,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            playback_buffer_length: DEFAULT_PLAYBACK_BUFFER_LENGTH,
            whammy: WhammySettings::default(),
            reverb: ReverbSettings::default(),
            use_minimum_stem_volume: false,
            minimum_stem_volume: DEFAULT_MINIMUM_STEM_VOLUME,
            shift_pitch_with_speed: false,
            volumes: StemVolumes::default(),
        }
    }
}

impl AudioSettings {
    /// Category volume multiplier for a stem
    pub fn volume_setting(&self, stem: Stem) -> f64 {
        self.volumes.get(stem.category())
    }

    /// Apply the minimum stem volume policy to an effective volume
    pub fn apply_volume_floor(&self, volume: f64) -> f64 {
        if self.use_minimum_stem_volume {
            volume.max(self.minimum_stem_volume)
        } else {
            volume
        }
    }
}

/// Whammy pitch-bend settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhammySettings {
    /// Attach pitch-shift effects to new stem channels
    pub enabled: bool,
    /// Pitch drop in semitones at full whammy
    pub max_shift_semitones: f32,
    /// FFT window size of the pitch shifter
    pub fft_size: u32,
    /// Oversampling factor of the pitch shifter
    pub oversampling: u32,
}

impl Default for WhammySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_shift_semitones: 1.0,
            fft_size: DEFAULT_FFT_SIZE,
            oversampling: DEFAULT_OVERSAMPLING,
        }
    }
}

impl WhammySettings {
    /// Initial (unshifted) pitch parameters for a new channel
    pub fn pitch_params(&self) -> PitchShiftParams {
        PitchShiftParams::new(self.fft_size, self.oversampling)
    }
}

/// Reverb chain settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbSettings {
    /// Wet stream volume relative to the dry stream's effective volume
    pub volume_multiplier: f64,
    /// Fade-in duration when reverb is switched on (ms)
    pub slide_in_ms: u32,
    /// Fade-out duration when reverb is switched off (ms)
    pub slide_out_ms: u32,
    pub low_eq: EqBand,
    pub mid_eq: EqBand,
    pub high_eq: EqBand,
    pub reverb: ReverbParams,
}

impl Default for ReverbSettings {
    fn default() -> Self {
        Self {
            volume_multiplier: 0.7,
            slide_in_ms: 300,
            slide_out_ms: 500,
            low_eq: EqBand::new(20.0, 2.5, 2.0),
            mid_eq: EqBand::new(1000.0, 2.5, -3.0),
            high_eq: EqBand::new(10000.0, 2.5, 2.0),
            reverb: ReverbParams::default(),
        }
    }
}

impl ReverbSettings {
    /// EQ bands in attach order (low, mid, high)
    pub fn eq_bands(&self) -> [EqBand; 3] {
        [self.low_eq, self.mid_eq, self.high_eq]
    }
}

/// Volume per category (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StemVolumes {
    pub song: f64,
    pub guitar: f64,
    pub bass: f64,
    pub rhythm: f64,
    pub keys: f64,
    pub vocals: f64,
    pub drums: f64,
    pub crowd: f64,
    pub sfx: f64,
}

impl Default for StemVolumes {
    fn default() -> Self {
        Self {
            song: 1.0,
            guitar: 1.0,
            bass: 1.0,
            rhythm: 1.0,
            keys: 1.0,
            vocals: 1.0,
            drums: 1.0,
            crowd: 0.5,
            sfx: 0.8,
        }
    }
}

impl StemVolumes {
    pub fn get(&self, category: VolumeCategory) -> f64 {
        match category {
            VolumeCategory::Song => self.song,
            VolumeCategory::Guitar => self.guitar,
            VolumeCategory::Bass => self.bass,
            VolumeCategory::Rhythm => self.rhythm,
            VolumeCategory::Keys => self.keys,
            VolumeCategory::Vocals => self.vocals,
            VolumeCategory::Drums => self.drums,
            VolumeCategory::Crowd => self.crowd,
            VolumeCategory::Sfx => self.sfx,
        }
    }

    /// Set a category volume, clamped to 0.0-1.0
    pub fn set(&mut self, category: VolumeCategory, volume: f64) {
        let volume = volume.clamp(0.0, 1.0);
        let slot = match category {
            VolumeCategory::Song => &mut self.song,
            VolumeCategory::Guitar => &mut self.guitar,
            VolumeCategory::Bass => &mut self.bass,
            VolumeCategory::Rhythm => &mut self.rhythm,
            VolumeCategory::Keys => &mut self.keys,
            VolumeCategory::Vocals => &mut self.vocals,
            VolumeCategory::Drums => &mut self.drums,
            VolumeCategory::Crowd => &mut self.crowd,
            VolumeCategory::Sfx => &mut self.sfx,
        };
        *slot = volume;
    }
}

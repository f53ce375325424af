//! Stem channels
//!
//! A stem channel plays one stem of a song (song, guitar, drums, ...) and
//! keeps its streams in sync:
//!
//! ```text
//!                ┌─> dry  [pitch shift] ────────────────────────┐
//! source stream ─┤                                              ├─> mix
//!                └─> wet  [pitch shift] [eq lo/mid/hi] [reverb] ┘
//! ```
//!
//! Both paths are splits of one decoded source, so they share its position
//! cursor: a seek on the dry stream moves the wet stream too. Volume, speed
//! and whammy pitch are applied to both paths; the wet path is silent unless
//! reverb is on.
//!
//! Control calls never return errors. Backend failures are reported through
//! [`ChannelError::report`] and playback carries on.

mod builder;
mod error;
mod handles;
mod speed;
mod stream;

pub use builder::open_stem_channel;
pub use error::{ChannelError, ChannelOp, ChannelResult, EffectSlot, StreamPath};
pub use handles::{ReverbChain, ReverbEffects, StreamHandles};
pub use speed::{normalize_speed, speed_pitch_semitones, tempo_percent, MAX_SPEED, MIN_SPEED};
pub use stream::{whammy_ratio, StemStreams, StreamStemChannel};

use crate::types::Stem;

/// Control surface of a playable stem
pub trait StemChannel {
    /// Stem this channel plays
    fn stem(&self) -> Stem;

    /// Current logical volume (before category volume and floor)
    fn volume(&self) -> f64;

    /// Whether reverb is requested on this channel
    fn is_reverbing(&self) -> bool;

    /// Set the logical volume
    fn set_volume(&mut self, volume: f64);

    /// Re-apply the current logical volume, picking up category volume
    /// changes from the settings
    fn refresh_volume(&mut self) {
        let volume = self.volume();
        self.set_volume(volume);
    }

    /// Bend pitch down by `percent` (0.0-1.0) of the configured whammy range
    fn set_whammy_pitch(&mut self, percent: f32);

    /// Seek to `seconds`, optionally compensating for the playback buffer
    fn set_position(&mut self, seconds: f64, buffer_compensation: bool);

    /// Seek to `seconds` with playback buffer compensation
    fn seek(&mut self, seconds: f64) {
        self.set_position(seconds, true);
    }

    /// Current position in seconds, `None` if the backend could not tell
    fn position(&self, buffer_compensation: bool) -> Option<f64>;

    /// Stream length in seconds, `None` if the backend could not tell
    fn length_seconds(&self) -> Option<f64>;

    /// Set playback speed (1.0 = original)
    fn set_speed(&mut self, speed: f32);

    /// Switch the reverb chain on or off
    fn set_reverb(&mut self, enable: bool);

    /// Release all backend resources
    ///
    /// Idempotent; every control call after disposal is a no-op. Returns an
    /// error only when the source stream leaked.
    fn dispose(&mut self) -> ChannelResult<()>;

    /// Whether [`StemChannel::dispose`] has run
    fn is_disposed(&self) -> bool;
}

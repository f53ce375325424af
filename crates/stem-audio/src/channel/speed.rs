//! Playback speed
//!
//! Speed is applied as a tempo change (percent) on every stream of a stem so
//! the dry and wet paths stay at the same rate.

use crate::backend::{AudioBackend, ChannelAttribute, StreamHandle};
use crate::types::Stem;

use super::error::{ChannelError, ChannelOp, StreamPath};

/// Slowest supported playback speed
pub const MIN_SPEED: f32 = 0.05;

/// Fastest supported playback speed
pub const MAX_SPEED: f32 = 50.0;

/// Largest pitch change applied along with speed (semitones)
pub const MAX_SPEED_PITCH_SEMITONES: f32 = 60.0;

/// Clamp a speed to the supported range, rounded to two decimals
pub fn normalize_speed(speed: f32) -> f32 {
    (speed.clamp(MIN_SPEED, MAX_SPEED) * 100.0).round() / 100.0
}

/// Tempo attribute value for a speed (1.05 → +5%)
pub fn tempo_percent(speed: f32) -> f32 {
    normalize_speed(speed) * 100.0 - 100.0
}

/// Pitch change that matches a speed change (chipmunk effect)
pub fn speed_pitch_semitones(speed: f32) -> f32 {
    (12.0 * normalize_speed(speed).log2()).clamp(-MAX_SPEED_PITCH_SEMITONES, MAX_SPEED_PITCH_SEMITONES)
}

/// Set the speed of every stream of a stem
///
/// Each stream is updated independently; a failure on one is reported and
/// the rest are still updated.
pub(crate) fn apply_speed<B>(
    backend: &B,
    stem: Stem,
    speed: f32,
    shift_pitch: bool,
    streams: &[(StreamPath, StreamHandle)],
) where
    B: AudioBackend + ?Sized,
{
    let tempo = tempo_percent(speed);
    for &(path, stream) in streams {
        if let Err(err) = backend.set_attribute(stream, ChannelAttribute::Tempo, tempo) {
            ChannelError::backend(stem, path, ChannelOp::SetTempo, format!("{:+.0}%", tempo), err)
                .report();
        }
    }

    if !shift_pitch {
        return;
    }

    let semitones = speed_pitch_semitones(speed);
    for &(path, stream) in streams {
        if let Err(err) = backend.set_attribute(stream, ChannelAttribute::Pitch, semitones) {
            ChannelError::backend(stem, path, ChannelOp::SetPitch, format!("{:+.2} st", semitones), err)
                .report();
        }
    }
}

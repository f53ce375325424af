//! Backend-driven stem channel

use std::sync::Arc;

use crate::backend::{
    AudioBackend, BackendResult, ChannelAttribute, EffectParams, PitchShiftParams, StreamHandle,
};
use crate::config::SharedSettings;
use crate::types::Stem;

use super::error::{ChannelError, ChannelOp, ChannelResult, StreamPath};
use super::handles::StreamHandles;
use super::speed::apply_speed;
use super::StemChannel;

/// Pitch ratio for a whammy position
///
/// `percent` 0.0 leaves pitch unchanged, 1.0 bends down by
/// `max_shift_semitones`.
pub fn whammy_ratio(max_shift_semitones: f32, percent: f32) -> f32 {
    2.0_f32.powf(-(max_shift_semitones * percent) / 12.0)
}

/// Streams owned by one stem channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemStreams {
    /// Decoded source both paths are split from (`None` if the backend
    /// frees it together with the splits)
    pub source: Option<StreamHandle>,
    pub dry: StreamHandles,
    pub wet: StreamHandles,
}

/// Stem channel driving a native [`AudioBackend`]
///
/// Owns its source stream and both handle groups; they are released by
/// [`StemChannel::dispose`] or on drop.
pub struct StreamStemChannel<B: AudioBackend + ?Sized> {
    backend: Arc<B>,
    settings: SharedSettings,
    stem: Stem,
    source: Option<StreamHandle>,
    dry: StreamHandles,
    wet: StreamHandles,
    pitch: PitchShiftParams,
    /// Logical volume
    volume: f64,
    /// Category volume the current backend volume was computed with
    last_stem_volume: f64,
    reverbing: bool,
    disposed: bool,
}

impl<B: AudioBackend + ?Sized> StreamStemChannel<B> {
    /// Wrap streams that were already created on the backend
    ///
    /// Does not touch the backend. The streams' current volume is assumed to
    /// match `volume` under the current category volume.
    pub fn new(
        backend: Arc<B>,
        settings: SharedSettings,
        stem: Stem,
        streams: StemStreams,
        pitch: PitchShiftParams,
        volume: f64,
    ) -> Self {
        let last_stem_volume = settings.read().volume_setting(stem);
        Self {
            backend,
            settings,
            stem,
            source: streams.source,
            dry: streams.dry,
            wet: streams.wet,
            pitch,
            volume,
            last_stem_volume,
            reverbing: false,
            disposed: false,
        }
    }

    pub fn dry(&self) -> &StreamHandles {
        &self.dry
    }

    pub fn wet(&self) -> &StreamHandles {
        &self.wet
    }

    pub fn pitch_params(&self) -> &PitchShiftParams {
        &self.pitch
    }

    /// Whammy needs a pitch shifter on both paths
    fn has_whammy(&self) -> bool {
        self.dry.pitch_fx().is_some() && self.wet.pitch_fx().is_some()
    }

    fn group(&self, path: StreamPath) -> &StreamHandles {
        match path {
            StreamPath::Wet => &self.wet,
            StreamPath::Dry | StreamPath::Source => &self.dry,
        }
    }

    /// Report a failed backend call; pass the value through on success
    fn check<T>(
        &self,
        path: StreamPath,
        op: ChannelOp,
        result: BackendResult<T>,
        detail: impl FnOnce() -> String,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                ChannelError::backend(self.stem, path, op, detail(), err).report();
                None
            }
        }
    }

    fn set_stream_volume(&self, path: StreamPath, volume: f64) {
        let stream = self.group(path).stream();
        let result = self
            .backend
            .set_attribute(stream, ChannelAttribute::Volume, volume as f32);
        self.check(path, ChannelOp::SetVolume, result, || format!("{:.4} on {}", volume, stream));
    }

    fn slide_wet_volume(&self, target: f64, duration_ms: u32) {
        let stream = self.wet.stream();
        let result =
            self.backend
                .slide_attribute(stream, ChannelAttribute::Volume, target as f32, duration_ms);
        self.check(StreamPath::Wet, ChannelOp::SlideVolume, result, || {
            format!("to {:.4} over {}ms on {}", target, duration_ms, stream)
        });
    }

    fn enable_reverb(&mut self) {
        if self.wet.has_reverb() {
            return;
        }

        let (reverb, volume_setting) = {
            let settings = self.settings.read();
            (settings.reverb, settings.volume_setting(self.stem))
        };

        let stream = self.wet.stream();
        for (slot, err) in self.wet.attach_reverb(&*self.backend, &reverb) {
            ChannelError::backend(
                self.stem,
                StreamPath::Wet,
                ChannelOp::AttachEffect(slot),
                format!("on {}", stream),
                err,
            )
            .report();
        }

        let target = volume_setting * self.volume * reverb.volume_multiplier;
        self.slide_wet_volume(target, reverb.slide_in_ms);
        log::debug!("{}: reverb on", self.stem);
    }

    fn disable_reverb(&mut self) {
        if !self.wet.has_reverb() {
            return;
        }

        let stream = self.wet.stream();
        let result = self.wet.detach_reverb(&*self.backend);
        self.check(StreamPath::Wet, ChannelOp::DetachEffects, result, || {
            format!("eq and reverb on {}", stream)
        });

        let slide_out_ms = self.settings.read().reverb.slide_out_ms;
        self.slide_wet_volume(0.0, slide_out_ms);
        log::debug!("{}: reverb off", self.stem);
    }
}

impl<B: AudioBackend + ?Sized> StemChannel for StreamStemChannel<B> {
    fn stem(&self) -> Stem {
        self.stem
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn is_reverbing(&self) -> bool {
        self.reverbing
    }

    fn set_volume(&mut self, volume: f64) {
        if self.disposed {
            return;
        }

        let (volume_setting, new_volume, reverb_multiplier) = {
            let settings = self.settings.read();
            let volume_setting = settings.volume_setting(self.stem);
            (
                volume_setting,
                settings.apply_volume_floor(volume_setting * volume),
                settings.reverb.volume_multiplier,
            )
        };

        let old_volume = self.last_stem_volume * self.volume;
        if (old_volume - new_volume).abs() < f64::EPSILON {
            return;
        }

        self.volume = volume;
        self.last_stem_volume = volume_setting;

        self.set_stream_volume(StreamPath::Dry, new_volume);
        let reverb_volume = if self.reverbing {
            new_volume * reverb_multiplier
        } else {
            0.0
        };
        self.set_stream_volume(StreamPath::Wet, reverb_volume);
    }

    fn set_whammy_pitch(&mut self, percent: f32) {
        if self.disposed {
            return;
        }
        let (Some(dry_fx), Some(wet_fx)) = (self.dry.pitch_fx(), self.wet.pitch_fx()) else {
            return;
        };

        let percent = percent.clamp(0.0, 1.0);
        let max_shift = self.settings.read().whammy.max_shift_semitones;
        self.pitch.pitch_shift = whammy_ratio(max_shift, percent);

        let params = EffectParams::PitchShift(self.pitch);
        for (path, fx) in [(StreamPath::Dry, dry_fx), (StreamPath::Wet, wet_fx)] {
            let result = self.backend.set_effect_parameters(fx, &params);
            self.check(path, ChannelOp::SetPitchShift, result, || {
                format!("ratio {:.4} on {}", self.pitch.pitch_shift, fx)
            });
        }
    }

    fn set_position(&mut self, seconds: f64, buffer_compensation: bool) {
        if self.disposed {
            return;
        }

        let mut position = seconds;
        if buffer_compensation {
            position += self.settings.read().playback_buffer_length;
        }

        // The FFT window of the pitch shifter delays its output; the backend
        // does not account for it.
        let stream = self.dry.stream();
        if self.has_whammy() {
            let result = self.backend.attribute(stream, ChannelAttribute::Frequency);
            let sample_rate = self.check(StreamPath::Dry, ChannelOp::QuerySampleRate, result, || {
                stream.to_string()
            });
            if let Some(latency) = sample_rate.and_then(|rate| self.pitch.window_latency(rate)) {
                position += latency;
            }
        }

        let bytes = match self.backend.seconds_to_bytes(stream, position) {
            Ok(bytes) if bytes >= 0 => bytes as u64,
            Ok(bytes) => {
                ChannelError::InvalidByteOffset {
                    stem: self.stem,
                    path: StreamPath::Dry,
                    seconds: position,
                    bytes,
                }
                .report();
                return;
            }
            Err(err) => {
                ChannelError::backend(
                    self.stem,
                    StreamPath::Dry,
                    ChannelOp::SecondsToBytes,
                    format!("{:.3}s on {}", position, stream),
                    err,
                )
                .report();
                return;
            }
        };

        // Dry and wet share the source's cursor, one seek moves both
        let result = self.backend.seek_bytes(stream, bytes);
        self.check(StreamPath::Dry, ChannelOp::Seek, result, || {
            format!("{:.3}s ({} bytes) on {}", position, bytes, stream)
        });
    }

    fn position(&self, buffer_compensation: bool) -> Option<f64> {
        if self.disposed {
            return None;
        }

        let stream = self.dry.stream();
        let detail = || stream.to_string();
        let bytes = self.check(
            StreamPath::Dry,
            ChannelOp::QueryPosition,
            self.backend.position_bytes(stream),
            detail,
        )?;
        let seconds = self.check(
            StreamPath::Dry,
            ChannelOp::QueryPosition,
            self.backend.bytes_to_seconds(stream, bytes),
            detail,
        )?;

        if buffer_compensation {
            Some(seconds - self.settings.read().playback_buffer_length)
        } else {
            Some(seconds)
        }
    }

    fn length_seconds(&self) -> Option<f64> {
        if self.disposed {
            return None;
        }

        let stream = self.dry.stream();
        let detail = || stream.to_string();
        let bytes = self.check(
            StreamPath::Dry,
            ChannelOp::QueryLength,
            self.backend.length_bytes(stream),
            detail,
        )?;
        self.check(
            StreamPath::Dry,
            ChannelOp::QueryLength,
            self.backend.bytes_to_seconds(stream, bytes),
            detail,
        )
    }

    fn set_speed(&mut self, speed: f32) {
        if self.disposed {
            return;
        }

        let shift_pitch = self.settings.read().shift_pitch_with_speed;
        apply_speed(
            &*self.backend,
            self.stem,
            speed,
            shift_pitch,
            &[
                (StreamPath::Dry, self.dry.stream()),
                (StreamPath::Wet, self.wet.stream()),
            ],
        );
    }

    fn set_reverb(&mut self, enable: bool) {
        if self.disposed {
            return;
        }

        // Set first so volume changes made from here on target the new state
        self.reverbing = enable;
        if enable {
            self.enable_reverb();
        } else {
            self.disable_reverb();
        }
    }

    fn dispose(&mut self) -> ChannelResult<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        for path in [StreamPath::Wet, StreamPath::Dry] {
            let group = self.group(path);
            let result = group.release(&*self.backend);
            self.check(path, ChannelOp::FreeStream, result, || group.stream().to_string());
        }

        let Some(source) = self.source.take() else {
            log::debug!("{}: disposed", self.stem);
            return Ok(());
        };

        match self.backend.free_stream(source) {
            Ok(()) => {}
            Err(err) if err.is_already_freed() => {
                log::debug!("{}: source {} was already freed", self.stem, source);
            }
            Err(err) => {
                let leak = ChannelError::SourceLeak {
                    stem: self.stem,
                    source: err,
                };
                leak.report();
                return Err(leak);
            }
        }

        log::debug!("{}: disposed", self.stem);
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl<B: AudioBackend + ?Sized> Drop for StreamStemChannel<B> {
    fn drop(&mut self) {
        // Failures were already reported
        let _ = self.dispose();
    }
}

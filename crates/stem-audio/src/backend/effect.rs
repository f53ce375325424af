//! Effect parameter blocks passed to the backend
//!
//! These mirror the parameter structures of the native DSP effects: an
//! FFT pitch shifter, a peaking EQ band and a reverb.

use serde::{Deserialize, Serialize};

/// Default FFT window size for the whammy pitch shifter
pub const DEFAULT_FFT_SIZE: u32 = 2048;

/// Default oversampling factor for the whammy pitch shifter
pub const DEFAULT_OVERSAMPLING: u32 = 8;

/// FFT pitch-shift parameters
///
/// Shared by the dry and wet paths of a stem: whenever the whammy bar moves
/// the same parameters are pushed to both effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchShiftParams {
    /// Pitch ratio (1.0 = unchanged, 0.5 = one octave down)
    pub pitch_shift: f32,
    /// Additional shift in semitones, applied on top of the ratio
    pub semitones: f32,
    /// FFT window size in samples. The window delays the shifted output by
    /// `fft_size / sample_rate` seconds.
    pub fft_size: u32,
    /// Oversampling factor (overlap between FFT frames)
    pub oversampling: u32,
}

impl Default for PitchShiftParams {
    fn default() -> Self {
        Self {
            pitch_shift: 1.0,
            semitones: 0.0,
            fft_size: DEFAULT_FFT_SIZE,
            oversampling: DEFAULT_OVERSAMPLING,
        }
    }
}

impl PitchShiftParams {
    /// Create parameters with the given window and no shift
    pub fn new(fft_size: u32, oversampling: u32) -> Self {
        Self {
            fft_size,
            oversampling,
            ..Default::default()
        }
    }

    /// Processing latency of the FFT window in seconds
    pub fn window_latency(&self, sample_rate: f32) -> Option<f64> {
        if sample_rate > 0.0 {
            Some(self.fft_size as f64 / sample_rate as f64)
        } else {
            None
        }
    }
}

/// Peaking EQ band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EqBand {
    /// Center frequency in Hz
    pub center_hz: f32,
    /// Bandwidth in octaves
    pub bandwidth: f32,
    /// Gain in dB
    pub gain_db: f32,
}

impl EqBand {
    pub const fn new(center_hz: f32, bandwidth: f32, gain_db: f32) -> Self {
        Self {
            center_hz,
            bandwidth,
            gain_db,
        }
    }
}

/// Reverb parameters (all values 0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReverbParams {
    pub dry_mix: f32,
    pub wet_mix: f32,
    pub room_size: f32,
    pub damping: f32,
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self {
            dry_mix: 0.3,
            wet_mix: 1.0,
            room_size: 0.4,
            damping: 0.7,
        }
    }
}

/// Parameters for one effect instance, tagged by effect kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectParams {
    PitchShift(PitchShiftParams),
    PeakEq(EqBand),
    Reverb(ReverbParams),
}

impl EffectParams {
    /// Short name of the effect kind for log output
    pub fn kind_name(&self) -> &'static str {
        match self {
            EffectParams::PitchShift(_) => "pitch shift",
            EffectParams::PeakEq(_) => "peak eq",
            EffectParams::Reverb(_) => "reverb",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pitch_params_do_not_shift() {
        let params = PitchShiftParams::default();
        assert_eq!(params.pitch_shift, 1.0);
        assert_eq!(params.semitones, 0.0);
        assert_eq!(params.fft_size, DEFAULT_FFT_SIZE);
    }

    #[test]
    fn test_window_latency() {
        let params = PitchShiftParams::new(4410, 4);
        let latency = params.window_latency(44100.0).unwrap();
        assert!((latency - 0.1).abs() < 1e-9);
        assert!(params.window_latency(0.0).is_none());
    }
}

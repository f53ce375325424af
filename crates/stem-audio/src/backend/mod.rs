//! Native audio backend interface
//!
//! The decoding/mixing engine is an external collaborator. Stem channels only
//! need a small set of primitives from it, collected in [`AudioBackend`]:
//!
//! - **Streams**: split a decoded source into playback streams, free them
//! - **Effects**: attach/detach DSP effects, update their parameters
//! - **Attributes**: get/set/slide volume, sample rate, tempo and pitch
//! - **Position**: convert between seconds and bytes, seek by bytes
//!
//! Every call returns a [`BackendResult`]; the stem channel decides how a
//! failure is reported.

mod effect;
mod error;

#[cfg(test)]
pub(crate) mod recording;

use std::fmt;
use std::num::NonZeroU32;

pub use effect::{
    EffectParams, EqBand, PitchShiftParams, ReverbParams, DEFAULT_FFT_SIZE, DEFAULT_OVERSAMPLING,
};
pub use error::{BackendError, BackendResult};

/// Handle to a backend stream
///
/// The backend never hands out zero, so a handle is always non-zero and
/// "no stream" is expressed with `Option<StreamHandle>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(NonZeroU32);

impl StreamHandle {
    /// Wrap a raw backend handle (`None` for zero)
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Raw handle value
    pub fn raw(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream#{}", self.0)
    }
}

/// Handle to an effect attached to a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FxHandle(NonZeroU32);

impl FxHandle {
    /// Wrap a raw backend handle (`None` for zero)
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Raw handle value
    pub fn raw(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for FxHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fx#{}", self.0)
    }
}

/// Stream attributes the stem channel reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelAttribute {
    /// Linear volume (1.0 = unity)
    Volume,
    /// Sample rate in Hz
    Frequency,
    /// Tempo change in percent (0 = original speed)
    Tempo,
    /// Pitch change in semitones
    Pitch,
}

impl fmt::Display for ChannelAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelAttribute::Volume => "volume",
            ChannelAttribute::Frequency => "frequency",
            ChannelAttribute::Tempo => "tempo",
            ChannelAttribute::Pitch => "pitch",
        };
        f.write_str(name)
    }
}

/// Primitives required from the native audio engine
///
/// Methods take `&self`: the native engine owns its own stream table and
/// synchronisation, and several stem channels share one backend through an
/// `Arc`.
pub trait AudioBackend {
    /// Create a playback stream fed from a decoded source stream
    ///
    /// Dry and wet paths of a stem are two splits of the same source and
    /// therefore share its position cursor.
    fn create_split_stream(&self, source: StreamHandle) -> BackendResult<StreamHandle>;

    /// Attach an effect to a stream
    fn create_effect(&self, stream: StreamHandle, params: &EffectParams)
        -> BackendResult<FxHandle>;

    /// Detach an effect from a stream
    fn remove_effect(&self, stream: StreamHandle, fx: FxHandle) -> BackendResult<()>;

    /// Update the parameters of an attached effect
    fn set_effect_parameters(&self, fx: FxHandle, params: &EffectParams) -> BackendResult<()>;

    /// Read a stream attribute
    fn attribute(&self, stream: StreamHandle, attribute: ChannelAttribute) -> BackendResult<f32>;

    /// Write a stream attribute immediately
    fn set_attribute(
        &self,
        stream: StreamHandle,
        attribute: ChannelAttribute,
        value: f32,
    ) -> BackendResult<()>;

    /// Ramp a stream attribute from its current value to `target`
    ///
    /// The ramp runs inside the backend. Issuing a new slide on the same
    /// attribute replaces the running one.
    fn slide_attribute(
        &self,
        stream: StreamHandle,
        attribute: ChannelAttribute,
        target: f32,
        duration_ms: u32,
    ) -> BackendResult<()>;

    /// Convert a time offset into a byte offset in the stream's format
    ///
    /// A negative result means the position cannot be represented.
    fn seconds_to_bytes(&self, stream: StreamHandle, seconds: f64) -> BackendResult<i64>;

    /// Convert a byte offset into seconds
    fn bytes_to_seconds(&self, stream: StreamHandle, bytes: u64) -> BackendResult<f64>;

    /// Current playback position in bytes
    fn position_bytes(&self, stream: StreamHandle) -> BackendResult<u64>;

    /// Total stream length in bytes
    fn length_bytes(&self, stream: StreamHandle) -> BackendResult<u64>;

    /// Seek to a byte offset
    fn seek_bytes(&self, stream: StreamHandle, bytes: u64) -> BackendResult<()>;

    /// Free a stream and every effect attached to it
    ///
    /// Fails with [`BackendError::InvalidHandle`] if the stream was already
    /// freed.
    fn free_stream(&self, stream: StreamHandle) -> BackendResult<()>;
}

//! Stem channel error reporting
//!
//! Control operations never fail from the caller's point of view. Each
//! backend call site instead builds one [`ChannelError`] carrying the
//! operation, the stream path, the call parameters and the backend code,
//! and hands it to [`ChannelError::report`].

use std::fmt;

use thiserror::Error;

use crate::backend::BackendError;
use crate::types::Stem;

/// Which of a channel's streams a call targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPath {
    /// Decoded source stream shared by both paths
    Source,
    /// Dry playback stream
    Dry,
    /// Parallel reverb stream
    Wet,
}

impl fmt::Display for StreamPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamPath::Source => "source",
            StreamPath::Dry => "dry",
            StreamPath::Wet => "wet",
        };
        f.write_str(name)
    }
}

/// Slot of an effect in a stream handle group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSlot {
    PitchShift,
    LowEq,
    MidEq,
    HighEq,
    Reverb,
}

impl fmt::Display for EffectSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectSlot::PitchShift => "pitch shift",
            EffectSlot::LowEq => "low eq",
            EffectSlot::MidEq => "mid eq",
            EffectSlot::HighEq => "high eq",
            EffectSlot::Reverb => "reverb",
        };
        f.write_str(name)
    }
}

/// Backend operation issued by a stem channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOp {
    CreateStream,
    AttachEffect(EffectSlot),
    DetachEffects,
    SetPitchShift,
    QuerySampleRate,
    QueryPosition,
    QueryLength,
    SecondsToBytes,
    Seek,
    SetVolume,
    SlideVolume,
    SetTempo,
    SetPitch,
    FreeStream,
}

impl fmt::Display for ChannelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelOp::CreateStream => f.write_str("create stream"),
            ChannelOp::AttachEffect(slot) => write!(f, "attach {}", slot),
            ChannelOp::DetachEffects => f.write_str("detach effects"),
            ChannelOp::SetPitchShift => f.write_str("set pitch shift"),
            ChannelOp::QuerySampleRate => f.write_str("query sample rate"),
            ChannelOp::QueryPosition => f.write_str("query position"),
            ChannelOp::QueryLength => f.write_str("query length"),
            ChannelOp::SecondsToBytes => f.write_str("convert seconds to bytes"),
            ChannelOp::Seek => f.write_str("seek"),
            ChannelOp::SetVolume => f.write_str("set volume"),
            ChannelOp::SlideVolume => f.write_str("slide volume"),
            ChannelOp::SetTempo => f.write_str("set tempo"),
            ChannelOp::SetPitch => f.write_str("set pitch"),
            ChannelOp::FreeStream => f.write_str("free stream"),
        }
    }
}

/// A failed stem channel operation
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A backend call failed
    #[error("{stem} {path}: {op} failed ({detail}): {source}")]
    Backend {
        stem: Stem,
        path: StreamPath,
        op: ChannelOp,
        detail: String,
        #[source]
        source: BackendError,
    },

    /// Seconds-to-bytes conversion produced an unusable offset
    #[error("{stem} {path}: no byte position for {seconds:.3}s (got {bytes})")]
    InvalidByteOffset {
        stem: Stem,
        path: StreamPath,
        seconds: f64,
        bytes: i64,
    },

    /// The source stream could not be freed and has no other owner
    #[error("{stem}: failed to free source stream (THIS WILL LEAK MEMORY): {source}")]
    SourceLeak {
        stem: Stem,
        #[source]
        source: BackendError,
    },
}

impl ChannelError {
    /// Build a backend call failure
    pub fn backend(
        stem: Stem,
        path: StreamPath,
        op: ChannelOp,
        detail: impl Into<String>,
        source: BackendError,
    ) -> Self {
        Self::Backend {
            stem,
            path,
            op,
            detail: detail.into(),
            source,
        }
    }

    /// Whether this failure leaks backend resources
    pub fn is_leak(&self) -> bool {
        matches!(self, ChannelError::SourceLeak { .. })
    }

    /// Backend error code behind this failure, if any
    pub fn backend_error(&self) -> Option<BackendError> {
        match self {
            ChannelError::Backend { source, .. } | ChannelError::SourceLeak { source, .. } => {
                Some(*source)
            }
            ChannelError::InvalidByteOffset { .. } => None,
        }
    }

    /// Log this failure at its severity
    pub fn report(&self) {
        if self.is_leak() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }
    }
}

/// Result type for stem channel operations that do return errors
pub type ChannelResult<T> = Result<T, ChannelError>;

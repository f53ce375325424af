//! Stem Audio - Multi-stream stem playback for rhythm games
//!
//! Each stem of a song (guitar, bass, drums, ...) plays through a
//! [`channel::StemChannel`] built on a native [`backend::AudioBackend`]: a dry
//! path plus a parallel reverb path, with whammy pitch bend, seeking, speed
//! and category volumes kept in sync across both.

pub mod backend;
pub mod channel;
pub mod config;
pub mod mixer;
pub mod types;

pub use types::*;

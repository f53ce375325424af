//! Common types for stem playback
//!
//! Stem identities and the volume categories they are mixed under.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of distinct stems a song can provide
pub const NUM_STEMS: usize = 15;

/// Stem identifiers
///
/// A song ships any subset of these. Split drum and vocal stems
/// (`Drums1`..`Drums4`, `Vocals1`/`Vocals2`) share the volume of their parent
/// instrument, see [`Stem::category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Stem {
    Song = 0,
    Guitar = 1,
    Bass = 2,
    Rhythm = 3,
    Keys = 4,
    Vocals = 5,
    Vocals1 = 6,
    Vocals2 = 7,
    Drums = 8,
    Drums1 = 9,
    Drums2 = 10,
    Drums3 = 11,
    Drums4 = 12,
    Crowd = 13,
    Sfx = 14,
}

impl Stem {
    /// Get all stems in order
    pub const ALL: [Stem; NUM_STEMS] = [
        Stem::Song,
        Stem::Guitar,
        Stem::Bass,
        Stem::Rhythm,
        Stem::Keys,
        Stem::Vocals,
        Stem::Vocals1,
        Stem::Vocals2,
        Stem::Drums,
        Stem::Drums1,
        Stem::Drums2,
        Stem::Drums3,
        Stem::Drums4,
        Stem::Crowd,
        Stem::Sfx,
    ];

    /// Convert from index to Stem
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// Get the name of this stem
    pub fn name(&self) -> &'static str {
        match self {
            Stem::Song => "Song",
            Stem::Guitar => "Guitar",
            Stem::Bass => "Bass",
            Stem::Rhythm => "Rhythm",
            Stem::Keys => "Keys",
            Stem::Vocals => "Vocals",
            Stem::Vocals1 => "Vocals1",
            Stem::Vocals2 => "Vocals2",
            Stem::Drums => "Drums",
            Stem::Drums1 => "Drums1",
            Stem::Drums2 => "Drums2",
            Stem::Drums3 => "Drums3",
            Stem::Drums4 => "Drums4",
            Stem::Crowd => "Crowd",
            Stem::Sfx => "Sfx",
        }
    }

    /// Volume category this stem is mixed under
    pub fn category(&self) -> VolumeCategory {
        match self {
            Stem::Song => VolumeCategory::Song,
            Stem::Guitar => VolumeCategory::Guitar,
            Stem::Bass => VolumeCategory::Bass,
            Stem::Rhythm => VolumeCategory::Rhythm,
            Stem::Keys => VolumeCategory::Keys,
            Stem::Vocals | Stem::Vocals1 | Stem::Vocals2 => VolumeCategory::Vocals,
            Stem::Drums | Stem::Drums1 | Stem::Drums2 | Stem::Drums3 | Stem::Drums4 => {
                VolumeCategory::Drums
            }
            Stem::Crowd => VolumeCategory::Crowd,
            Stem::Sfx => VolumeCategory::Sfx,
        }
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// User-facing volume sliders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeCategory {
    Song,
    Guitar,
    Bass,
    Rhythm,
    Keys,
    Vocals,
    Drums,
    Crowd,
    Sfx,
}

//! Process-wide settings handle shared by all stem channels

use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use anyhow::Result;

use super::{save_config, AudioSettings};

/// Shared, read-mostly handle to the current [`AudioSettings`]
///
/// Stem channels read through this on every control call, so a volume slider
/// change becomes visible to each channel the next time its volume is
/// applied (see `StemChannel::refresh_volume`).
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<AudioSettings>>,
}

impl SharedSettings {
    pub fn new(settings: AudioSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Read the current settings
    ///
    /// A writer that panicked cannot leave the settings half-written (updates
    /// are plain field stores), so a poisoned lock is read through.
    pub fn read(&self) -> RwLockReadGuard<'_, AudioSettings> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current settings
    pub fn snapshot(&self) -> AudioSettings {
        self.read().clone()
    }

    /// Modify the settings in place
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut AudioSettings),
    {
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *guard);
    }

    /// Write the current settings to a YAML file
    pub fn save(&self, path: &Path) -> Result<()> {
        save_config(&*self.read(), path)
    }
}

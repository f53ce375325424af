//! Stem mixer
//!
//! Holds the stem channels of the song currently playing and fans song-wide
//! controls (seek, speed, category volumes) out to them. Per-stem controls
//! such as whammy and reverb are routed to the matching channel.

use crate::channel::{ChannelError, ChannelResult, StemChannel};
use crate::config::SharedSettings;
use crate::types::{Stem, VolumeCategory};

/// The channels of one song, at most one per stem
pub struct StemMixer {
    settings: SharedSettings,
    channels: Vec<Box<dyn StemChannel>>,
}

impl StemMixer {
    pub fn new(settings: SharedSettings) -> Self {
        Self {
            settings,
            channels: Vec::new(),
        }
    }

    pub fn settings(&self) -> &SharedSettings {
        &self.settings
    }

    /// Add a channel, disposing any channel already playing its stem
    ///
    /// Returns the disposal error of the replaced channel, if any.
    pub fn add_channel(&mut self, channel: Box<dyn StemChannel>) -> ChannelResult<()> {
        let replaced = self.remove_channel(channel.stem());
        self.channels.push(channel);
        match replaced {
            Some(mut old) => old.dispose(),
            None => Ok(()),
        }
    }

    /// Take a channel out of the mixer without disposing it
    pub fn remove_channel(&mut self, stem: Stem) -> Option<Box<dyn StemChannel>> {
        let index = self.channels.iter().position(|c| c.stem() == stem)?;
        Some(self.channels.remove(index))
    }

    pub fn channel(&self, stem: Stem) -> Option<&dyn StemChannel> {
        self.channels
            .iter()
            .find(|c| c.stem() == stem)
            .map(|c| c.as_ref())
    }

    pub fn channel_mut(&mut self, stem: Stem) -> Option<&mut (dyn StemChannel + 'static)> {
        self.channels
            .iter_mut()
            .find(|c| c.stem() == stem)
            .map(|c| c.as_mut())
    }

    /// Stems with a channel, in insertion order
    pub fn stems(&self) -> impl Iterator<Item = Stem> + '_ {
        self.channels.iter().map(|c| c.stem())
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Change a category volume in the settings and apply it
    pub fn set_category_volume(&mut self, category: VolumeCategory, volume: f64) {
        self.settings.update(|s| s.volumes.set(category, volume));
        for channel in self
            .channels
            .iter_mut()
            .filter(|c| c.stem().category() == category)
        {
            channel.refresh_volume();
        }
    }

    /// Re-apply every channel's volume after the settings changed
    pub fn refresh_volumes(&mut self) {
        for channel in &mut self.channels {
            channel.refresh_volume();
        }
    }

    /// Set the logical volume of one stem; `false` if it has no channel
    pub fn set_volume(&mut self, stem: Stem, volume: f64) -> bool {
        match self.channel_mut(stem) {
            Some(channel) => {
                channel.set_volume(volume);
                true
            }
            None => false,
        }
    }

    pub fn set_whammy_pitch(&mut self, stem: Stem, percent: f32) -> bool {
        match self.channel_mut(stem) {
            Some(channel) => {
                channel.set_whammy_pitch(percent);
                true
            }
            None => false,
        }
    }

    pub fn set_reverb(&mut self, stem: Stem, enable: bool) -> bool {
        match self.channel_mut(stem) {
            Some(channel) => {
                channel.set_reverb(enable);
                true
            }
            None => false,
        }
    }

    /// Seek every channel
    pub fn set_position(&mut self, seconds: f64, buffer_compensation: bool) {
        for channel in &mut self.channels {
            channel.set_position(seconds, buffer_compensation);
        }
    }

    /// Song position, taken from the first channel that can report one
    pub fn position(&self, buffer_compensation: bool) -> Option<f64> {
        self.channels
            .iter()
            .find_map(|c| c.position(buffer_compensation))
    }

    /// Longest channel length
    pub fn length_seconds(&self) -> Option<f64> {
        self.channels
            .iter()
            .filter_map(|c| c.length_seconds())
            .reduce(f64::max)
    }

    pub fn set_speed(&mut self, speed: f32) {
        for channel in &mut self.channels {
            channel.set_speed(speed);
        }
    }

    /// Dispose and drop every channel
    ///
    /// Every channel is disposed even if an earlier one fails.
    pub fn dispose(&mut self) -> Vec<ChannelError> {
        let errors: Vec<ChannelError> = self
            .channels
            .drain(..)
            .filter_map(|mut channel| channel.dispose().err())
            .collect();
        if !errors.is_empty() {
            log::error!("{} stem channel(s) leaked on dispose", errors.len());
        }
        errors
    }
}

impl Drop for StemMixer {
    fn drop(&mut self) {
        self.dispose();
    }
}

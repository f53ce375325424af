//! Stream handle groups
//!
//! A stem plays through two groups: the dry path and the wet (reverb) path.
//! Each group owns one playback stream plus the effects attached to it.

use crate::backend::{AudioBackend, BackendError, BackendResult, EffectParams, FxHandle, StreamHandle};
use crate::config::ReverbSettings;

use super::error::EffectSlot;

/// Effects making up the reverb chain, in attach order
///
/// A slot is `None` only when attaching that effect failed; such a slot is
/// skipped on detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReverbEffects {
    pub low_eq: Option<FxHandle>,
    pub mid_eq: Option<FxHandle>,
    pub high_eq: Option<FxHandle>,
    pub reverb: Option<FxHandle>,
}

impl ReverbEffects {
    /// Attached handles in attach order
    pub fn handles(&self) -> impl Iterator<Item = FxHandle> {
        [self.low_eq, self.mid_eq, self.high_eq, self.reverb]
            .into_iter()
            .flatten()
    }
}

/// Reverb chain state of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverbChain {
    #[default]
    Detached,
    Attached(ReverbEffects),
}

/// A playback stream and its attached effects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHandles {
    stream: StreamHandle,
    pitch_fx: Option<FxHandle>,
    reverb: ReverbChain,
}

impl StreamHandles {
    /// Group for a stream with no effects attached
    pub fn new(stream: StreamHandle) -> Self {
        Self {
            stream,
            pitch_fx: None,
            reverb: ReverbChain::Detached,
        }
    }

    /// Group for a stream with a pitch-shift effect already attached
    pub fn with_pitch_fx(stream: StreamHandle, pitch_fx: FxHandle) -> Self {
        Self {
            pitch_fx: Some(pitch_fx),
            ..Self::new(stream)
        }
    }

    pub fn stream(&self) -> StreamHandle {
        self.stream
    }

    pub fn pitch_fx(&self) -> Option<FxHandle> {
        self.pitch_fx
    }

    pub fn reverb(&self) -> &ReverbChain {
        &self.reverb
    }

    pub fn has_reverb(&self) -> bool {
        matches!(self.reverb, ReverbChain::Attached(_))
    }

    /// Attach a pitch-shift effect
    ///
    /// Replaces nothing: an already attached pitch effect is returned as is.
    pub(crate) fn attach_pitch_fx<B>(&mut self, backend: &B, params: &EffectParams) -> BackendResult<FxHandle>
    where
        B: AudioBackend + ?Sized,
    {
        if let Some(fx) = self.pitch_fx {
            return Ok(fx);
        }
        let fx = backend.create_effect(self.stream, params)?;
        self.pitch_fx = Some(fx);
        Ok(fx)
    }

    /// Detach the pitch-shift effect, if any
    pub(crate) fn detach_pitch_fx<B>(&mut self, backend: &B) -> BackendResult<()>
    where
        B: AudioBackend + ?Sized,
    {
        match self.pitch_fx.take() {
            Some(fx) => backend.remove_effect(self.stream, fx),
            None => Ok(()),
        }
    }

    /// Attach the low, mid and high EQ bands and then the reverb
    ///
    /// Every effect is attempted even if an earlier one failed. Returns the
    /// slots that failed; the chain counts as attached if any effect made it.
    pub(crate) fn attach_reverb<B>(
        &mut self,
        backend: &B,
        settings: &ReverbSettings,
    ) -> Vec<(EffectSlot, BackendError)>
    where
        B: AudioBackend + ?Sized,
    {
        if self.has_reverb() {
            return Vec::new();
        }

        let mut failures = Vec::new();
        let mut attach = |slot: EffectSlot, params: EffectParams| {
            backend
                .create_effect(self.stream, &params)
                .map_err(|err| failures.push((slot, err)))
                .ok()
        };

        let [low, mid, high] = settings.eq_bands();
        let effects = ReverbEffects {
            low_eq: attach(EffectSlot::LowEq, EffectParams::PeakEq(low)),
            mid_eq: attach(EffectSlot::MidEq, EffectParams::PeakEq(mid)),
            high_eq: attach(EffectSlot::HighEq, EffectParams::PeakEq(high)),
            reverb: attach(EffectSlot::Reverb, EffectParams::Reverb(settings.reverb)),
        };

        if effects.handles().next().is_some() {
            self.reverb = ReverbChain::Attached(effects);
        }
        failures
    }

    /// Detach every effect of the reverb chain
    ///
    /// The chain is reset to detached whether or not the backend accepted
    /// each removal. Returns the first removal failure.
    pub(crate) fn detach_reverb<B>(&mut self, backend: &B) -> BackendResult<()>
    where
        B: AudioBackend + ?Sized,
    {
        let effects = match std::mem::take(&mut self.reverb) {
            ReverbChain::Detached => return Ok(()),
            ReverbChain::Attached(effects) => effects,
        };

        let mut first_error = None;
        for fx in effects.handles() {
            if let Err(err) = backend.remove_effect(self.stream, fx) {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Free the stream
    ///
    /// Effects are not detached first: freeing a stream releases everything
    /// attached to it.
    pub(crate) fn release<B>(&self, backend: &B) -> BackendResult<()>
    where
        B: AudioBackend + ?Sized,
    {
        backend.free_stream(self.stream)
    }
}

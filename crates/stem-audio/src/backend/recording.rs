//! In-memory backend that records every call
//!
//! Used by the unit tests in place of the native engine. Failures can be
//! injected per call kind, optionally restricted to one stream.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{
    AudioBackend, BackendError, BackendResult, ChannelAttribute, EffectParams, FxHandle,
    StreamHandle,
};

/// 44.1kHz, 16-bit stereo
pub const SAMPLE_RATE: f32 = 44100.0;
pub const BYTES_PER_SECOND: f64 = 44100.0 * 4.0;

/// A recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateSplitStream { source: StreamHandle, stream: StreamHandle },
    CreateEffect { stream: StreamHandle, params: EffectParams },
    RemoveEffect { stream: StreamHandle, fx: FxHandle },
    SetEffectParameters { fx: FxHandle, params: EffectParams },
    Attribute { stream: StreamHandle, attribute: ChannelAttribute },
    SetAttribute { stream: StreamHandle, attribute: ChannelAttribute, value: f32 },
    SlideAttribute { stream: StreamHandle, attribute: ChannelAttribute, target: f32, duration_ms: u32 },
    SecondsToBytes { stream: StreamHandle, seconds: f64 },
    BytesToSeconds { stream: StreamHandle, bytes: u64 },
    PositionBytes { stream: StreamHandle },
    LengthBytes { stream: StreamHandle },
    SeekBytes { stream: StreamHandle, bytes: u64 },
    FreeStream { stream: StreamHandle },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    CreateSplitStream,
    CreateEffect,
    RemoveEffect,
    SetEffectParameters,
    Attribute,
    SetAttribute,
    SlideAttribute,
    SecondsToBytes,
    BytesToSeconds,
    PositionBytes,
    LengthBytes,
    SeekBytes,
    FreeStream,
}

impl Call {
    pub fn kind(&self) -> CallKind {
        match self {
            Call::CreateSplitStream { .. } => CallKind::CreateSplitStream,
            Call::CreateEffect { .. } => CallKind::CreateEffect,
            Call::RemoveEffect { .. } => CallKind::RemoveEffect,
            Call::SetEffectParameters { .. } => CallKind::SetEffectParameters,
            Call::Attribute { .. } => CallKind::Attribute,
            Call::SetAttribute { .. } => CallKind::SetAttribute,
            Call::SlideAttribute { .. } => CallKind::SlideAttribute,
            Call::SecondsToBytes { .. } => CallKind::SecondsToBytes,
            Call::BytesToSeconds { .. } => CallKind::BytesToSeconds,
            Call::PositionBytes { .. } => CallKind::PositionBytes,
            Call::LengthBytes { .. } => CallKind::LengthBytes,
            Call::SeekBytes { .. } => CallKind::SeekBytes,
            Call::FreeStream { .. } => CallKind::FreeStream,
        }
    }
}

#[derive(Default)]
struct State {
    next_handle: u32,
    calls: Vec<Call>,
    failures: HashMap<(CallKind, Option<u32>), BackendError>,
    attributes: HashMap<(StreamHandle, ChannelAttribute), f32>,
    positions: HashMap<StreamHandle, u64>,
    length_bytes: u64,
}

#[derive(Default)]
pub struct RecordingBackend {
    state: Mutex<State>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.lock().length_bytes = (BYTES_PER_SECOND * 180.0) as u64;
        backend
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn next_raw(state: &mut State) -> u32 {
        state.next_handle += 1;
        state.next_handle
    }

    /// Allocate a stream handle, standing in for a decoded source
    pub fn stream(&self) -> StreamHandle {
        let mut state = self.lock();
        StreamHandle::new(Self::next_raw(&mut state)).unwrap()
    }

    /// Fail every call of `kind`
    pub fn fail(&self, kind: CallKind, error: BackendError) {
        self.lock().failures.insert((kind, None), error);
    }

    /// Fail calls of `kind` that target `stream`
    pub fn fail_on(&self, kind: CallKind, stream: StreamHandle, error: BackendError) {
        self.lock().failures.insert((kind, Some(stream.raw())), error);
    }

    /// Fail parameter updates on one effect
    pub fn fail_on_fx(&self, fx: FxHandle, error: BackendError) {
        self.lock()
            .failures
            .insert((CallKind::SetEffectParameters, Some(fx.raw())), error);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.lock().calls.iter().filter(|c| c.kind() == kind).count()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<Call> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn set_attribute_value(&self, stream: StreamHandle, attribute: ChannelAttribute, value: f32) {
        self.lock().attributes.insert((stream, attribute), value);
    }

    pub fn attribute_value(&self, stream: StreamHandle, attribute: ChannelAttribute) -> f32 {
        let state = self.lock();
        Self::read_attribute(&state, stream, attribute)
    }

    pub fn set_position(&self, stream: StreamHandle, bytes: u64) {
        self.lock().positions.insert(stream, bytes);
    }

    fn read_attribute(state: &State, stream: StreamHandle, attribute: ChannelAttribute) -> f32 {
        state
            .attributes
            .get(&(stream, attribute))
            .copied()
            .unwrap_or(match attribute {
                ChannelAttribute::Volume => 1.0,
                ChannelAttribute::Frequency => SAMPLE_RATE,
                ChannelAttribute::Tempo | ChannelAttribute::Pitch => 0.0,
            })
    }

    /// Record `call` and return the injected failure for it, if any
    fn record(state: &mut State, call: Call, target: Option<u32>) -> BackendResult<()> {
        let kind = call.kind();
        state.calls.push(call);
        let failure = target
            .and_then(|t| state.failures.get(&(kind, Some(t))))
            .or_else(|| state.failures.get(&(kind, None)));
        match failure {
            Some(err) => Err(*err),
            None => Ok(()),
        }
    }
}

impl AudioBackend for RecordingBackend {
    fn create_split_stream(&self, source: StreamHandle) -> BackendResult<StreamHandle> {
        let mut state = self.lock();
        let stream = StreamHandle::new(Self::next_raw(&mut state)).unwrap();
        Self::record(&mut state, Call::CreateSplitStream { source, stream }, Some(stream.raw()))?;
        Ok(stream)
    }

    fn create_effect(&self, stream: StreamHandle, params: &EffectParams) -> BackendResult<FxHandle> {
        let mut state = self.lock();
        Self::record(&mut state, Call::CreateEffect { stream, params: *params }, Some(stream.raw()))?;
        Ok(FxHandle::new(Self::next_raw(&mut state)).unwrap())
    }

    fn remove_effect(&self, stream: StreamHandle, fx: FxHandle) -> BackendResult<()> {
        let mut state = self.lock();
        Self::record(&mut state, Call::RemoveEffect { stream, fx }, Some(stream.raw()))
    }

    fn set_effect_parameters(&self, fx: FxHandle, params: &EffectParams) -> BackendResult<()> {
        let mut state = self.lock();
        Self::record(&mut state, Call::SetEffectParameters { fx, params: *params }, Some(fx.raw()))
    }

    fn attribute(&self, stream: StreamHandle, attribute: ChannelAttribute) -> BackendResult<f32> {
        let mut state = self.lock();
        Self::record(&mut state, Call::Attribute { stream, attribute }, Some(stream.raw()))?;
        Ok(Self::read_attribute(&state, stream, attribute))
    }

    fn set_attribute(&self, stream: StreamHandle, attribute: ChannelAttribute, value: f32) -> BackendResult<()> {
        let mut state = self.lock();
        Self::record(&mut state, Call::SetAttribute { stream, attribute, value }, Some(stream.raw()))?;
        state.attributes.insert((stream, attribute), value);
        Ok(())
    }

    fn slide_attribute(
        &self,
        stream: StreamHandle,
        attribute: ChannelAttribute,
        target: f32,
        duration_ms: u32,
    ) -> BackendResult<()> {
        let mut state = self.lock();
        let call = Call::SlideAttribute { stream, attribute, target, duration_ms };
        Self::record(&mut state, call, Some(stream.raw()))?;
        // Slides complete instantly here
        state.attributes.insert((stream, attribute), target);
        Ok(())
    }

    fn seconds_to_bytes(&self, stream: StreamHandle, seconds: f64) -> BackendResult<i64> {
        let mut state = self.lock();
        Self::record(&mut state, Call::SecondsToBytes { stream, seconds }, Some(stream.raw()))?;
        // Round down to a whole frame
        Ok(((seconds * BYTES_PER_SECOND) as i64 / 4) * 4)
    }

    fn bytes_to_seconds(&self, stream: StreamHandle, bytes: u64) -> BackendResult<f64> {
        let mut state = self.lock();
        Self::record(&mut state, Call::BytesToSeconds { stream, bytes }, Some(stream.raw()))?;
        Ok(bytes as f64 / BYTES_PER_SECOND)
    }

    fn position_bytes(&self, stream: StreamHandle) -> BackendResult<u64> {
        let mut state = self.lock();
        Self::record(&mut state, Call::PositionBytes { stream }, Some(stream.raw()))?;
        Ok(state.positions.get(&stream).copied().unwrap_or(0))
    }

    fn length_bytes(&self, stream: StreamHandle) -> BackendResult<u64> {
        let mut state = self.lock();
        Self::record(&mut state, Call::LengthBytes { stream }, Some(stream.raw()))?;
        Ok(state.length_bytes)
    }

    fn seek_bytes(&self, stream: StreamHandle, bytes: u64) -> BackendResult<()> {
        let mut state = self.lock();
        Self::record(&mut state, Call::SeekBytes { stream, bytes }, Some(stream.raw()))?;
        state.positions.insert(stream, bytes);
        Ok(())
    }

    fn free_stream(&self, stream: StreamHandle) -> BackendResult<()> {
        let mut state = self.lock();
        Self::record(&mut state, Call::FreeStream { stream }, Some(stream.raw()))
    }
}

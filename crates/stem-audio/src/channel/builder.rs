//! Stem channel construction

use std::sync::Arc;

use crate::backend::{AudioBackend, ChannelAttribute, EffectParams, StreamHandle};
use crate::config::SharedSettings;
use crate::types::Stem;

use super::error::{ChannelError, ChannelOp, ChannelResult, EffectSlot, StreamPath};
use super::handles::StreamHandles;
use super::stream::{StemStreams, StreamStemChannel};

/// Open a stem channel on a decoded source stream
///
/// Splits `source` into a dry and a wet stream, attaches the whammy pitch
/// shifter to both (if enabled in the settings) and sets the initial volume.
/// The channel takes ownership of `source` on success; on failure every
/// stream created here is freed again and `source` stays with the caller.
///
/// Pitch shifting is all or nothing: if it cannot be attached to both paths
/// it is removed from both and the channel plays without whammy.
pub fn open_stem_channel<B>(
    backend: Arc<B>,
    settings: SharedSettings,
    stem: Stem,
    source: StreamHandle,
    volume: f64,
) -> ChannelResult<StreamStemChannel<B>>
where
    B: AudioBackend + ?Sized,
{
    let dry_stream = backend.create_split_stream(source).map_err(|err| {
        ChannelError::backend(stem, StreamPath::Dry, ChannelOp::CreateStream, format!("from {}", source), err)
    })?;

    let wet_stream = match backend.create_split_stream(source) {
        Ok(stream) => stream,
        Err(err) => {
            if let Err(free_err) = backend.free_stream(dry_stream) {
                ChannelError::backend(
                    stem,
                    StreamPath::Dry,
                    ChannelOp::FreeStream,
                    dry_stream.to_string(),
                    free_err,
                )
                .report();
            }
            return Err(ChannelError::backend(
                stem,
                StreamPath::Wet,
                ChannelOp::CreateStream,
                format!("from {}", source),
                err,
            ));
        }
    };

    let mut dry = StreamHandles::new(dry_stream);
    let mut wet = StreamHandles::new(wet_stream);

    let (whammy, effective_volume) = {
        let settings = settings.read();
        let effective = settings.apply_volume_floor(settings.volume_setting(stem) * volume);
        (settings.whammy, effective)
    };
    let pitch = whammy.pitch_params();

    if whammy.enabled {
        attach_whammy(&*backend, stem, &EffectParams::PitchShift(pitch), &mut dry, &mut wet);
    }

    for (path, stream, value) in [
        (StreamPath::Dry, dry_stream, effective_volume),
        (StreamPath::Wet, wet_stream, 0.0),
    ] {
        if let Err(err) = backend.set_attribute(stream, ChannelAttribute::Volume, value as f32) {
            ChannelError::backend(stem, path, ChannelOp::SetVolume, format!("{:.4} on {}", value, stream), err)
                .report();
        }
    }

    log::debug!(
        "{}: opened {} (dry {}, wet {}, whammy {})",
        stem,
        source,
        dry_stream,
        wet_stream,
        dry.pitch_fx().is_some()
    );

    let streams = StemStreams {
        source: Some(source),
        dry,
        wet,
    };
    Ok(StreamStemChannel::new(backend, settings, stem, streams, pitch, volume))
}

/// Attach a pitch shifter to both paths, or to neither
fn attach_whammy<B>(
    backend: &B,
    stem: Stem,
    params: &EffectParams,
    dry: &mut StreamHandles,
    wet: &mut StreamHandles,
) where
    B: AudioBackend + ?Sized,
{
    let mut complete = true;
    for (path, group) in [(StreamPath::Dry, &mut *dry), (StreamPath::Wet, &mut *wet)] {
        if let Err(err) = group.attach_pitch_fx(backend, params) {
            ChannelError::backend(
                stem,
                path,
                ChannelOp::AttachEffect(EffectSlot::PitchShift),
                group.stream().to_string(),
                err,
            )
            .report();
            complete = false;
            break;
        }
    }

    if complete {
        return;
    }

    for (path, group) in [(StreamPath::Dry, dry), (StreamPath::Wet, wet)] {
        let stream = group.stream();
        if let Err(err) = group.detach_pitch_fx(backend) {
            ChannelError::backend(stem, path, ChannelOp::DetachEffects, format!("pitch shift on {}", stream), err)
                .report();
        }
    }
    log::warn!("{}: whammy unavailable", stem);
}

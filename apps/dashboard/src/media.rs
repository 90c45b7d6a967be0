//! rodio-backed audio output for voice previews.

use std::{io::Cursor, sync::Arc};

use client_core::{AudioOutput, PreviewError};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

pub struct RodioOutput {
    // The stream has to stay alive for the handle to produce sound.
    device: Option<(OutputStream, OutputStreamHandle)>,
}

impl RodioOutput {
    /// Opens the default output device. Without one, clips still load and
    /// cache but playing them fails with [`PreviewError::OutputUnavailable`].
    pub fn open_default() -> Self {
        match OutputStream::try_default() {
            Ok(device) => Self {
                device: Some(device),
            },
            Err(err) => {
                tracing::warn!("no audio output device; previews are disabled: {err}");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { device: None }
    }

    pub fn is_available(&self) -> bool {
        self.device.is_some()
    }
}

impl AudioOutput for RodioOutput {
    type Clip = Arc<[u8]>;
    type Playback = Sink;

    fn load_clip(&mut self, model: &str, bytes: Vec<u8>) -> Result<Self::Clip, PreviewError> {
        let clip: Arc<[u8]> = Arc::from(bytes);
        Decoder::new(Cursor::new(Arc::clone(&clip)))
            .map_err(|err| PreviewError::Decode(format!("{model}: {err}")))?;
        Ok(clip)
    }

    fn play(&mut self, clip: &Self::Clip) -> Result<Self::Playback, PreviewError> {
        let (_, handle) = self
            .device
            .as_ref()
            .ok_or_else(|| PreviewError::OutputUnavailable("no default output device".into()))?;
        let source = Decoder::new(Cursor::new(Arc::clone(clip)))
            .map_err(|err| PreviewError::Decode(err.to_string()))?;
        let sink = Sink::try_new(handle).map_err(|err| PreviewError::Playback(err.to_string()))?;
        sink.append(source);
        Ok(sink)
    }

    fn stop(&mut self, playback: Self::Playback) {
        playback.stop();
    }

    fn is_finished(&self, playback: &Self::Playback) -> bool {
        playback.empty()
    }

    fn release_clip(&mut self, clip: Self::Clip) {
        tracing::trace!(bytes = clip.len(), "releasing preview clip");
    }
}

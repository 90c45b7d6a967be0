//! Voice preview playback with a per-model clip cache.
//!
//! The player lives as long as the voices view. Clips are fetched once per
//! model, kept for the player's lifetime and released together when the player
//! is torn down. At most one preview plays at a time.

use std::collections::{HashMap, HashSet};

use shared::domain::{Voice, VoiceId};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{api::AdminApi, error::ClientError};

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Fetch(#[from] ClientError),
    #[error("audio output unavailable: {0}")]
    OutputUnavailable(String),
    #[error("failed to decode preview audio: {0}")]
    Decode(String),
    #[error("preview playback failed: {0}")]
    Playback(String),
}

/// Audio backend seam. A clip is a playable resource made from downloaded
/// bytes; a playback is one running instance of a clip.
pub trait AudioOutput {
    type Clip;
    type Playback;

    fn load_clip(&mut self, model: &str, bytes: Vec<u8>) -> Result<Self::Clip, PreviewError>;
    fn play(&mut self, clip: &Self::Clip) -> Result<Self::Playback, PreviewError>;
    fn stop(&mut self, playback: Self::Playback);
    fn is_finished(&self, playback: &Self::Playback) -> bool;
    fn release_clip(&mut self, clip: Self::Clip);
}

/// Result of one player transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewStep {
    /// The toggled preview was stopped; nothing plays.
    Stopped,
    Playing,
    /// The caller must fetch `model` and report back through
    /// [`PreviewPlayer::resolve`] or [`PreviewPlayer::fail`].
    NeedsFetch { model: String },
    /// A fetch for the same model is already running.
    AwaitingFetch,
    /// The clip was stored but playback had moved on to another voice.
    Cached,
    Failed,
}

pub struct PreviewPlayer<O: AudioOutput> {
    output: O,
    cache: HashMap<String, O::Clip>,
    in_flight: HashSet<String>,
    current: Option<VoiceId>,
    waiting_model: Option<String>,
    playback: Option<O::Playback>,
}

impl<O: AudioOutput> PreviewPlayer<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            cache: HashMap::new(),
            in_flight: HashSet::new(),
            current: None,
            waiting_model: None,
            playback: None,
        }
    }

    pub fn currently_playing(&self) -> Option<VoiceId> {
        self.current
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn is_cached(&self, model: &str) -> bool {
        self.cache.contains_key(model)
    }

    pub fn cached_clips(&self) -> usize {
        self.cache.len()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// Toggles the preview for `voice`. Stops whatever was playing first, then
    /// marks `voice` as playing before its audio is ready.
    pub fn begin(&mut self, voice: &Voice) -> PreviewStep {
        if self.current == Some(voice.id) {
            self.stop();
            return PreviewStep::Stopped;
        }

        self.stop();
        self.current = Some(voice.id);

        if self.cache.contains_key(&voice.model) {
            return self.start(&voice.model);
        }

        self.waiting_model = Some(voice.model.clone());
        if !self.in_flight.insert(voice.model.clone()) {
            return PreviewStep::AwaitingFetch;
        }
        PreviewStep::NeedsFetch {
            model: voice.model.clone(),
        }
    }

    /// Stores fetched audio for `model` and starts it if the current voice is
    /// still waiting for it.
    pub fn resolve(&mut self, model: &str, bytes: Vec<u8>) -> PreviewStep {
        self.in_flight.remove(model);
        if !self.cache.contains_key(model) {
            match self.output.load_clip(model, bytes) {
                Ok(clip) => {
                    debug!(model, "preview clip cached");
                    self.cache.insert(model.to_string(), clip);
                }
                Err(err) => {
                    warn!(model, error = %err, "preview clip could not be loaded");
                    self.clear_if_waiting(model);
                    return PreviewStep::Failed;
                }
            }
        }

        if self.waiting_model.as_deref() == Some(model) && self.current.is_some() {
            self.waiting_model = None;
            return self.start(model);
        }
        PreviewStep::Cached
    }

    /// Records a failed fetch. Nothing is cached for `model`.
    pub fn fail(&mut self, model: &str, err: &PreviewError) {
        self.in_flight.remove(model);
        warn!(model, error = %err, "preview fetch failed");
        self.clear_if_waiting(model);
    }

    /// Clears the playing state once the running preview has finished.
    /// Returns true when something changed.
    pub fn poll(&mut self) -> bool {
        let finished = self
            .playback
            .as_ref()
            .is_some_and(|playback| self.output.is_finished(playback));
        if finished {
            if let Some(playback) = self.playback.take() {
                self.output.stop(playback);
            }
            self.current = None;
        }
        finished
    }

    pub fn stop(&mut self) {
        if let Some(playback) = self.playback.take() {
            self.output.stop(playback);
        }
        self.current = None;
        self.waiting_model = None;
    }

    /// Full preview round trip for callers that can await the fetch inline.
    pub async fn play_preview(
        &mut self,
        voice: &Voice,
        api: &dyn AdminApi,
    ) -> Result<PreviewStep, PreviewError> {
        match self.begin(voice) {
            PreviewStep::NeedsFetch { model } => match api.fetch_preview(&model).await {
                Ok(bytes) => Ok(self.resolve(&model, bytes)),
                Err(err) => {
                    let err = PreviewError::from(err);
                    self.fail(&model, &err);
                    Err(err)
                }
            },
            step => Ok(step),
        }
    }

    /// Stops playback and releases every cached clip.
    pub fn teardown(&mut self) {
        self.stop();
        let released = self.cache.len();
        for (_, clip) in self.cache.drain() {
            self.output.release_clip(clip);
        }
        self.in_flight.clear();
        if released > 0 {
            debug!(released, "preview clips released");
        }
    }

    fn start(&mut self, model: &str) -> PreviewStep {
        let Some(clip) = self.cache.get(model) else {
            return PreviewStep::Failed;
        };
        match self.output.play(clip) {
            Ok(playback) => {
                self.playback = Some(playback);
                PreviewStep::Playing
            }
            Err(err) => {
                warn!(model, error = %err, "preview playback failed");
                self.current = None;
                PreviewStep::Failed
            }
        }
    }

    fn clear_if_waiting(&mut self, model: &str) {
        if self.waiting_model.as_deref() == Some(model) {
            self.waiting_model = None;
            self.current = None;
        }
    }
}

impl<O: AudioOutput> Drop for PreviewPlayer<O> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/preview_tests.rs"]
mod tests;

use shared::domain::{Voice, VoiceId};
use tracing::info;

use crate::{
    error::{ClientResult, Operation},
    list::ListHandle,
};

impl ListHandle<Voice> {
    pub async fn load(&self) -> ClientResult<usize> {
        self.load_with(Operation::LoadVoices, self.api().list_voices())
            .await
    }

    /// Makes `id` the default voice. The local copy is rewritten in a single
    /// pass under the collection lock so no reader ever sees zero or two
    /// defaults.
    pub async fn set_default(&self, id: VoiceId) -> ClientResult<()> {
        self.api().set_default_voice(id).await?;
        info!(voice_id = id.0, "default voice changed");
        self.apply(Operation::SetDefaultVoice, |list| {
            list.rewrite_all(|voice| voice.is_default = voice.id == id)
        });
        Ok(())
    }
}

pub fn default_voice(voices: &[Voice]) -> Option<&Voice> {
    voices.iter().find(|voice| voice.is_default)
}

#[cfg(test)]
#[path = "tests/voices_tests.rs"]
mod tests;

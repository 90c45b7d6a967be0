//! Voices tab: voice cards with audio preview and default selection.

use std::sync::Arc;

use client_core::{
    AdminApi, DefaultVoiceSelector, ListController, PreviewError, PreviewPlayer, PreviewStep,
};
use crossbeam_channel::Sender;
use eframe::egui;
use shared::domain::{Voice, VoiceId};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{PageToken, UiEvent},
        orchestration::dispatch_backend_command,
    },
    media::RodioOutput,
    ui::{error_color, show_item_error, show_load_state},
};

enum VoiceAction {
    Reload,
    Preview(Voice),
    SetDefault(Voice),
}

pub struct VoicesPage {
    token: PageToken,
    voices: ListController<Voice>,
    selector: DefaultVoiceSelector,
    player: PreviewPlayer<RodioOutput>,
}

impl VoicesPage {
    pub fn mount(
        token: PageToken,
        api: Arc<dyn AdminApi>,
        output: RodioOutput,
        cmd_tx: &Sender<BackendCommand>,
        status: &mut String,
    ) -> Self {
        let page = Self {
            token,
            voices: ListController::new(api),
            selector: DefaultVoiceSelector::default(),
            player: PreviewPlayer::new(output),
        };
        page.reload(cmd_tx, status);
        page
    }

    pub fn token(&self) -> PageToken {
        self.token
    }

    pub fn selector(&self) -> &DefaultVoiceSelector {
        &self.selector
    }

    pub fn player(&self) -> &PreviewPlayer<RodioOutput> {
        &self.player
    }

    fn reload(&self, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        dispatch_backend_command(
            cmd_tx,
            BackendCommand::LoadVoices {
                page: self.token,
                voices: self.voices.handle(),
            },
            status,
        );
    }

    pub fn on_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::DefaultVoiceSettled { voice, outcome, .. } => {
                self.selector
                    .settle(voice, outcome.map_err(|err| err.message().to_string()));
            }
            UiEvent::PreviewFetched { model, outcome, .. } => match outcome {
                Ok(bytes) => {
                    let step = self.player.resolve(&model, bytes);
                    tracing::debug!(model, ?step, "preview resolved");
                }
                Err(err) => self.player.fail(&model, &err),
            },
            _ => {}
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        if self.player.poll() {
            ui.ctx().request_repaint();
        }

        let snapshot = self.voices.snapshot();
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.heading("Voices");
            if ui.button("Reload").clicked() {
                actions.push(VoiceAction::Reload);
            }
            if self.player.is_loading() {
                ui.spinner();
                ui.weak("Loading preview…");
            }
        });
        if !self.player.output().is_available() {
            ui.colored_label(error_color(), "No audio output device; previews cannot play.");
        }
        ui.separator();

        if show_load_state(
            ui,
            snapshot.load_state(),
            snapshot.is_empty(),
            "Loading voices…",
            "No voices configured.",
        ) {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for voice in snapshot.items() {
                        self.show_card(ui, voice, &mut actions);
                    }
                });
        }

        for action in actions {
            self.apply(action, cmd_tx, status);
        }
    }

    fn show_card(&self, ui: &mut egui::Ui, voice: &Voice, actions: &mut Vec<VoiceAction>) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&voice.name).strong());
                if voice.is_default {
                    ui.label(
                        egui::RichText::new("Default")
                            .small()
                            .color(egui::Color32::from_rgb(60, 160, 90)),
                    );
                }
            });
            ui.weak(voice.model.as_str());
            if let Some(description) = &voice.description {
                ui.label(description.as_str());
            }

            ui.horizontal(|ui| {
                let playing = self.player.currently_playing() == Some(voice.id);
                let label = if playing { "Stop" } else { "Preview" };
                if ui.button(label).clicked() {
                    actions.push(VoiceAction::Preview(voice.clone()));
                }

                if ui
                    .add_enabled(
                        self.selector.can_set_default(voice),
                        egui::Button::new("Set as default"),
                    )
                    .clicked()
                {
                    actions.push(VoiceAction::SetDefault(voice.clone()));
                }
                if self.selector.is_pending(voice.id) {
                    ui.spinner();
                }
            });
            show_item_error(ui, self.selector.error_for(voice.id));
        });
    }

    fn apply(&mut self, action: VoiceAction, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        match action {
            VoiceAction::Reload => self.reload(cmd_tx, status),
            VoiceAction::Preview(voice) => self.preview(&voice, cmd_tx, status),
            VoiceAction::SetDefault(voice) => self.set_default(&voice, cmd_tx, status),
        }
    }

    fn preview(&mut self, voice: &Voice, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        let PreviewStep::NeedsFetch { model } = self.player.begin(voice) else {
            return;
        };
        let cmd = BackendCommand::FetchPreview {
            page: self.token,
            model: model.clone(),
        };
        if !dispatch_backend_command(cmd_tx, cmd, status) {
            self.player
                .fail(&model, &PreviewError::Playback(status.clone()));
        }
    }

    fn set_default(&mut self, voice: &Voice, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        let Some(id) = self.selector.begin(voice) else {
            return;
        };
        let cmd = BackendCommand::SetDefaultVoice {
            page: self.token,
            voices: self.voices.handle(),
            id,
        };
        if !dispatch_backend_command(cmd_tx, cmd, status) {
            self.selector.settle(id, Err(status.clone()));
        }
    }

    pub fn is_playing(&self, id: VoiceId) -> bool {
        self.player.currently_playing() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use client_core::{ClientError, Operation};
    use crossbeam_channel::{bounded, Receiver};

    use super::*;
    use crate::{
        controller::events::UiError,
        test_support::{voice, CannedApi},
    };

    fn mounted(cmd_tx: &Sender<BackendCommand>, cmd_rx: &Receiver<BackendCommand>) -> VoicesPage {
        let mut status = String::new();
        let page = VoicesPage::mount(
            PageToken(3),
            Arc::new(CannedApi::default()),
            RodioOutput::disabled(),
            cmd_tx,
            &mut status,
        );
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::LoadVoices { page: PageToken(3), .. })
        ));
        page
    }

    #[test]
    fn preview_requests_a_fetch_once_per_model() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut status = String::new();
        let mut page = mounted(&cmd_tx, &cmd_rx);

        let luna = voice(1, "aura-luna-en", true);
        let twin = voice(2, "aura-luna-en", false);
        page.apply(VoiceAction::Preview(luna.clone()), &cmd_tx, &mut status);
        assert!(page.is_playing(luna.id));
        match cmd_rx.try_recv().expect("fetch command") {
            BackendCommand::FetchPreview { page: token, model } => {
                assert_eq!(token, PageToken(3));
                assert_eq!(model, "aura-luna-en");
            }
            other => panic!("unexpected command {}", other.name()),
        }

        page.apply(VoiceAction::Preview(twin.clone()), &cmd_tx, &mut status);
        assert!(page.is_playing(twin.id));
        assert!(cmd_rx.try_recv().is_err());
        assert!(page.player().is_loading());
    }

    #[test]
    fn undecodable_preview_clears_the_playing_voice() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut status = String::new();
        let mut page = mounted(&cmd_tx, &cmd_rx);
        let luna = voice(1, "aura-luna-en", true);
        page.apply(VoiceAction::Preview(luna.clone()), &cmd_tx, &mut status);

        page.on_event(UiEvent::PreviewFetched {
            page: PageToken(3),
            model: "aura-luna-en".into(),
            outcome: Ok(b"not audio".to_vec()),
        });

        assert!(!page.is_playing(luna.id));
        assert!(!page.player().is_loading());
        assert!(!page.player().is_cached("aura-luna-en"));
    }

    #[test]
    fn preview_is_abandoned_when_the_queue_is_full() {
        let (cmd_tx, cmd_rx) = bounded(1);
        let mut page = mounted(&cmd_tx, &cmd_rx);
        let (full_tx, _full_rx) = bounded(0);
        let mut status = String::new();
        let luna = voice(1, "aura-luna-en", true);

        page.apply(VoiceAction::Preview(luna.clone()), &full_tx, &mut status);

        assert!(!page.is_playing(luna.id));
        assert!(!page.player().is_loading());
        assert!(!status.is_empty());
    }

    #[test]
    fn set_default_disables_every_card_until_it_settles() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let mut status = String::new();
        let mut page = mounted(&cmd_tx, &cmd_rx);
        let asteria = voice(2, "aura-asteria-en", false);
        let orion = voice(3, "aura-orion-en", false);

        page.apply(VoiceAction::SetDefault(asteria.clone()), &cmd_tx, &mut status);
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::SetDefaultVoice { id: VoiceId(2), .. })
        ));
        assert!(!page.selector().can_set_default(&orion));

        page.on_event(UiEvent::DefaultVoiceSettled {
            page: PageToken(3),
            voice: asteria.id,
            outcome: Err(UiError::from_client(&ClientError::MissingRecord {
                op: Operation::SetDefaultVoice,
                id: 2,
            })),
        });

        assert!(page.selector().can_set_default(&orion));
        assert_eq!(
            page.selector().error_for(asteria.id),
            Some("Failed to set default voice")
        );
        assert_eq!(page.selector().error_for(orion.id), None);
    }
}

use std::{sync::Arc, time::Duration};

use client_core::{AdminApi, Settings};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{PageToken, UiEvent},
    media::RodioOutput,
    ui::{
        error_color, faq_panel::FaqPage, unanswered_panel::UnansweredPage,
        voices_panel::VoicesPage,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Faq,
    Unanswered,
    Voices,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Faq, Tab::Unanswered, Tab::Voices];

    fn label(self) -> &'static str {
        match self {
            Tab::Faq => "FAQ",
            Tab::Unanswered => "Unanswered",
            Tab::Voices => "Voices",
        }
    }
}

/// The mounted page. Only one exists at a time; replacing it drops the old
/// page together with its list controllers and preview clips.
pub enum Page {
    Faq(FaqPage),
    Unanswered(UnansweredPage),
    Voices(VoicesPage),
}

impl Page {
    fn tab(&self) -> Tab {
        match self {
            Page::Faq(_) => Tab::Faq,
            Page::Unanswered(_) => Tab::Unanswered,
            Page::Voices(_) => Tab::Voices,
        }
    }

    fn token(&self) -> PageToken {
        match self {
            Page::Faq(page) => page.token(),
            Page::Unanswered(page) => page.token(),
            Page::Voices(page) => page.token(),
        }
    }

    fn on_event(&mut self, event: UiEvent) {
        match self {
            Page::Faq(page) => page.on_event(event),
            Page::Unanswered(page) => page.on_event(event),
            Page::Voices(page) => page.on_event(event),
        }
    }
}

pub struct DashboardApp {
    api: Arc<dyn AdminApi>,
    settings: Settings,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    open_audio: fn() -> RodioOutput,
    next_token: u64,
    page: Page,
    status: String,
}

impl DashboardApp {
    pub fn new(
        api: Arc<dyn AdminApi>,
        settings: Settings,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        open_audio: fn() -> RodioOutput,
    ) -> Self {
        let mut status = String::new();
        let page = Page::Faq(FaqPage::mount(
            PageToken(1),
            Arc::clone(&api),
            &cmd_tx,
            &mut status,
        ));
        Self {
            api,
            settings,
            cmd_tx,
            ui_rx,
            open_audio,
            next_token: 2,
            page,
            status,
        }
    }

    pub fn tab(&self) -> Tab {
        self.page.tab()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Unmounts the current page and mounts a fresh one for `tab`, which loads
    /// its collection again.
    pub fn switch_to(&mut self, tab: Tab) {
        if tab == self.tab() {
            return;
        }
        let token = PageToken(self.next_token);
        self.next_token += 1;
        self.status.clear();
        tracing::debug!(tab = tab.label(), page = token.0, "mounting page");

        let api = Arc::clone(&self.api);
        self.page = match tab {
            Tab::Faq => Page::Faq(FaqPage::mount(token, api, &self.cmd_tx, &mut self.status)),
            Tab::Unanswered => Page::Unanswered(UnansweredPage::mount(
                token,
                api,
                &self.cmd_tx,
                &mut self.status,
            )),
            Tab::Voices => Page::Voices(VoicesPage::mount(
                token,
                api,
                (self.open_audio)(),
                &self.cmd_tx,
                &mut self.status,
            )),
        };
    }

    pub fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event.page() {
            None => {
                if let UiEvent::Error(err) = event {
                    self.status = err.message().to_string();
                }
            }
            Some(page) if page == self.page.token() => self.page.on_event(event),
            Some(page) => {
                tracing::debug!(page = page.0, "dropping event for an unmounted page");
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut selected = self.tab();
        egui::TopBottomPanel::top("dashboard_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Assistant admin");
                ui.separator();
                for tab in Tab::ALL {
                    ui.selectable_value(&mut selected, tab, tab.label());
                }
            });
        });
        if selected != self.tab() {
            self.switch_to(selected);
        }

        egui::TopBottomPanel::bottom("dashboard_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if !self.status.is_empty() {
                    ui.colored_label(error_color(), self.status.as_str());
                    ui.separator();
                }
                ui.weak(format!(
                    "API {}  ·  previews {}",
                    self.settings.api_base_url, self.settings.preview_base_url
                ));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match &mut self.page {
            Page::Faq(page) => page.show(ui, &self.cmd_tx, &mut self.status),
            Page::Unanswered(page) => page.show(ui, &self.cmd_tx, &mut self.status),
            Page::Voices(page) => page.show(ui, &self.cmd_tx, &mut self.status),
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use client_core::LoadState;
    use crossbeam_channel::bounded;

    use super::*;
    use crate::{
        controller::events::UiError,
        test_support::{faq, CannedApi},
    };

    fn app() -> (DashboardApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(16);
        let (ui_tx, ui_rx) = bounded(16);
        let api = Arc::new(CannedApi::with_faqs(vec![faq(1, "rooms")]));
        let app = DashboardApp::new(api, Settings::default(), cmd_tx, ui_rx, RodioOutput::disabled);
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn starts_on_the_faq_tab_and_loads_it() {
        let (app, cmd_rx, _ui_tx) = app();
        assert_eq!(app.tab(), Tab::Faq);
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::LoadFaqs { page: PageToken(1), .. })
        ));
    }

    #[test]
    fn switching_tabs_detaches_the_old_page() {
        let (mut app, cmd_rx, _ui_tx) = app();
        let old_handle = match cmd_rx.try_recv() {
            Ok(BackendCommand::LoadFaqs { faqs, .. }) => faqs,
            _ => panic!("expected the initial faq load"),
        };

        app.switch_to(Tab::Voices);

        assert_eq!(app.tab(), Tab::Voices);
        assert!(!old_handle.is_attached());
        assert!(matches!(
            cmd_rx.try_recv(),
            Ok(BackendCommand::LoadVoices { page: PageToken(2), .. })
        ));
    }

    #[test]
    fn events_for_an_unmounted_page_are_dropped() {
        let (mut app, _cmd_rx, ui_tx) = app();
        app.switch_to(Tab::Unanswered);
        app.switch_to(Tab::Faq);

        ui_tx
            .send(UiEvent::ListLoaded {
                page: PageToken(1),
                outcome: Ok(1),
            })
            .expect("send");
        ui_tx
            .send(UiEvent::CategoryChoices {
                page: PageToken(2),
                choices: vec!["stale".into()],
            })
            .expect("send");
        app.process_ui_events();

        match app.page() {
            Page::Faq(page) => {
                assert_eq!(page.token(), PageToken(3));
                assert_eq!(page.controller().load_state(), LoadState::Loading);
            }
            _ => panic!("expected the faq page"),
        }
        assert!(app.status().is_empty());
    }

    #[test]
    fn worker_errors_reach_the_status_bar() {
        let (mut app, _cmd_rx, ui_tx) = app();
        ui_tx
            .send(UiEvent::Error(UiError::startup(
                "backend worker startup failure",
            )))
            .expect("send");

        app.process_ui_events();

        assert_eq!(app.status(), "backend worker startup failure");
    }
}

//! Unanswered-questions tab: review, convert into a FAQ, or delete.

use std::sync::Arc;

use client_core::{AdminApi, ItemMode, ItemViews, ListController, Submission};
use crossbeam_channel::Sender;
use eframe::egui;
use shared::domain::{QuestionId, UnansweredQuestion, DEFAULT_CATEGORY};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{ItemTarget, PageToken, UiEvent},
        orchestration::dispatch_backend_command,
    },
    ui::{category_picker, show_item_error, show_load_state, RowMode},
};

enum QuestionAction {
    Reload,
    Convert(QuestionId),
    Delete(QuestionId),
    Cancel(QuestionId),
    Submit(QuestionId),
}

pub struct UnansweredPage {
    token: PageToken,
    questions: ListController<UnansweredQuestion>,
    rows: ItemViews<QuestionId>,
    category_choices: Vec<String>,
}

impl UnansweredPage {
    pub fn mount(
        token: PageToken,
        api: Arc<dyn AdminApi>,
        cmd_tx: &Sender<BackendCommand>,
        status: &mut String,
    ) -> Self {
        let page = Self {
            token,
            questions: ListController::new(api),
            rows: ItemViews::new(),
            category_choices: vec![DEFAULT_CATEGORY.to_string()],
        };
        page.reload(cmd_tx, status);
        page
    }

    pub fn token(&self) -> PageToken {
        self.token
    }

    pub fn category_choices(&self) -> &[String] {
        &self.category_choices
    }

    fn reload(&self, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        dispatch_backend_command(
            cmd_tx,
            BackendCommand::LoadQuestions {
                page: self.token,
                questions: self.questions.handle(),
            },
            status,
        );
    }

    pub fn on_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ListLoaded { .. } => self.forget_removed_rows(),
            UiEvent::CategoryChoices { choices, .. } => {
                for view in self.rows.iter_mut() {
                    if let Some(draft) = view.convert_draft_mut() {
                        draft.category.set_choices(choices.clone());
                    }
                }
                self.category_choices = choices;
            }
            UiEvent::ItemSettled {
                target: ItemTarget::Question(id),
                outcome,
                ..
            } => {
                self.rows
                    .settle(id, outcome.map_err(|err| err.message().to_string()));
                self.forget_removed_rows();
            }
            _ => {}
        }
    }

    fn forget_removed_rows(&mut self) {
        let live: Vec<QuestionId> = self
            .questions
            .read(|list| list.items().iter().map(|question| question.id).collect());
        self.rows.retain_ids(live);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        let snapshot = self.questions.snapshot();
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.heading("Unanswered questions");
            if ui.button("Reload").clicked() {
                actions.push(QuestionAction::Reload);
            }
        });
        ui.separator();

        if show_load_state(
            ui,
            snapshot.load_state(),
            snapshot.is_empty(),
            "Loading unanswered questions…",
            "No unanswered questions.",
        ) {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for question in snapshot.items() {
                        self.show_row(ui, question, &mut actions);
                    }
                });
        }

        for action in actions {
            self.apply(action, cmd_tx, status);
        }
    }

    fn show_row(
        &mut self,
        ui: &mut egui::Ui,
        question: &UnansweredQuestion,
        actions: &mut Vec<QuestionAction>,
    ) {
        let view = self.rows.view_mut(question.id);
        let pending = view.is_pending();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(&question.question).strong());
            ui.horizontal(|ui| {
                ui.weak(format!("Asked {} times", question.frequency));
                ui.weak(question.timestamp.format("%Y-%m-%d %H:%M").to_string());
            });

            match RowMode::of(view.mode()) {
                RowMode::Viewing | RowMode::Editing => {
                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(!pending, egui::Button::new("Convert to FAQ"))
                            .clicked()
                        {
                            actions.push(QuestionAction::Convert(question.id));
                        }
                        if ui.add_enabled(!pending, egui::Button::new("Delete")).clicked() {
                            actions.push(QuestionAction::Delete(question.id));
                        }
                    });
                }
                RowMode::ConfirmingConvert => {
                    if let Some(draft) = view.convert_draft_mut() {
                        ui.add(
                            egui::TextEdit::multiline(&mut draft.answer)
                                .hint_text("Answer")
                                .desired_rows(3)
                                .desired_width(f32::INFINITY),
                        );
                        ui.horizontal(|ui| {
                            ui.label("Category");
                            category_picker(
                                ui,
                                ("convert_category", question.id.0),
                                &mut draft.category,
                            );
                        });
                    } else if let ItemMode::ConfirmingConvert(draft) = view.mode() {
                        ui.label(draft.answer.as_str());
                        ui.weak(draft.category.resolved().unwrap_or_default());
                    }
                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(view.can_submit(), egui::Button::new("Convert"))
                            .clicked()
                        {
                            actions.push(QuestionAction::Submit(question.id));
                        }
                        if ui.add_enabled(!pending, egui::Button::new("Cancel")).clicked() {
                            actions.push(QuestionAction::Cancel(question.id));
                        }
                        if pending {
                            ui.spinner();
                        }
                    });
                }
                RowMode::ConfirmingDelete => {
                    ui.label("Delete this question?");
                    ui.horizontal(|ui| {
                        if ui.add_enabled(!pending, egui::Button::new("Delete")).clicked() {
                            actions.push(QuestionAction::Submit(question.id));
                        }
                        if ui.add_enabled(!pending, egui::Button::new("Cancel")).clicked() {
                            actions.push(QuestionAction::Cancel(question.id));
                        }
                        if pending {
                            ui.spinner();
                        }
                    });
                }
            }
            show_item_error(ui, view.last_error());
        });
    }

    fn apply(&mut self, action: QuestionAction, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        match action {
            QuestionAction::Reload => self.reload(cmd_tx, status),
            QuestionAction::Convert(id) => {
                self.rows
                    .view_mut(id)
                    .start_convert(self.category_choices.clone());
            }
            QuestionAction::Delete(id) => {
                self.rows.view_mut(id).start_delete();
            }
            QuestionAction::Cancel(id) => {
                self.rows.view_mut(id).cancel();
            }
            QuestionAction::Submit(id) => {
                let Some(submission) = self.rows.view_mut(id).submit() else {
                    return;
                };
                let questions = self.questions.handle();
                let page = self.token;
                let cmd = match submission {
                    Submission::Convert { id, request } => BackendCommand::ConvertQuestion {
                        page,
                        questions,
                        id,
                        request,
                    },
                    Submission::Delete { id } => BackendCommand::DeleteQuestion {
                        page,
                        questions,
                        id,
                    },
                    Submission::Update { .. } => return,
                };
                if !dispatch_backend_command(cmd_tx, cmd, status) {
                    self.rows.settle(id, Err(status.clone()));
                }
            }
        }
    }
}

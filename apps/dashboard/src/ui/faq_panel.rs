//! FAQ tab: the FAQ list sectioned by category, inline edit/delete per row and
//! the add form.

use std::sync::Arc;

use client_core::{
    category_choices, group_by_category, AddFaqForm, AdminApi, ItemMode, ItemViews,
    ListController, Submission,
};
use crossbeam_channel::Sender;
use eframe::egui;
use shared::domain::{Faq, FaqId};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{ItemTarget, PageToken, UiEvent},
        orchestration::dispatch_backend_command,
    },
    ui::{category_picker, show_item_error, show_load_state, RowMode},
};

enum FaqAction {
    Reload,
    OpenAddForm,
    CloseAddForm,
    SubmitAdd,
    Edit(FaqId),
    Delete(FaqId),
    Cancel(FaqId),
    Submit(FaqId),
}

pub struct FaqPage {
    token: PageToken,
    faqs: ListController<Faq>,
    rows: ItemViews<FaqId>,
    add_form: Option<AddFaqForm>,
}

impl FaqPage {
    pub fn mount(
        token: PageToken,
        api: Arc<dyn AdminApi>,
        cmd_tx: &Sender<BackendCommand>,
        status: &mut String,
    ) -> Self {
        let page = Self {
            token,
            faqs: ListController::new(api),
            rows: ItemViews::new(),
            add_form: None,
        };
        page.reload(cmd_tx, status);
        page
    }

    pub fn token(&self) -> PageToken {
        self.token
    }

    pub fn controller(&self) -> &ListController<Faq> {
        &self.faqs
    }

    pub fn rows(&self) -> &ItemViews<FaqId> {
        &self.rows
    }

    pub fn add_form(&self) -> Option<&AddFaqForm> {
        self.add_form.as_ref()
    }

    fn reload(&self, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        dispatch_backend_command(
            cmd_tx,
            BackendCommand::LoadFaqs {
                page: self.token,
                faqs: self.faqs.handle(),
            },
            status,
        );
    }

    pub fn on_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ListLoaded { outcome, .. } => {
                if let Ok(count) = outcome {
                    tracing::debug!(count, "faq page loaded");
                }
                self.forget_removed_rows();
                self.refresh_form_choices();
            }
            UiEvent::FaqCreated { outcome, .. } => match outcome {
                Ok(id) => {
                    tracing::debug!(faq_id = id.0, "closing add form");
                    self.add_form = None;
                }
                Err(err) => {
                    if let Some(form) = self.add_form.as_mut() {
                        form.settle(Err(err.message().to_string()));
                    }
                    self.refresh_form_choices();
                }
            },
            UiEvent::ItemSettled {
                target: ItemTarget::Faq(id),
                outcome,
                ..
            } => {
                self.rows
                    .settle(id, outcome.map_err(|err| err.message().to_string()));
                self.forget_removed_rows();
                self.refresh_form_choices();
            }
            _ => {}
        }
    }

    /// Keeps the open add form offering the categories of the current list.
    fn refresh_form_choices(&mut self) {
        if let Some(form) = self.add_form.as_mut() {
            let choices = self.faqs.read(|list| category_choices(list.items()));
            form.category.set_choices(choices);
        }
    }

    fn forget_removed_rows(&mut self) {
        let live: Vec<FaqId> = self.faqs.read(|list| list.items().iter().map(|faq| faq.id).collect());
        self.rows.retain_ids(live);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, cmd_tx: &Sender<BackendCommand>, status: &mut String) {
        let snapshot = self.faqs.snapshot();
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            ui.heading("FAQs");
            if ui
                .add_enabled(self.add_form.is_none(), egui::Button::new("Add FAQ"))
                .clicked()
            {
                actions.push(FaqAction::OpenAddForm);
            }
            if ui.button("Reload").clicked() {
                actions.push(FaqAction::Reload);
            }
        });
        ui.separator();

        if let Some(form) = self.add_form.as_mut() {
            show_add_form(ui, form, &mut actions);
            ui.separator();
        }

        if show_load_state(
            ui,
            snapshot.load_state(),
            snapshot.is_empty(),
            "Loading FAQs…",
            "No FAQs yet.",
        ) {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for group in group_by_category(snapshot.items()) {
                        egui::CollapsingHeader::new(
                            egui::RichText::new(group.category).strong(),
                        )
                        .id_salt(("faq_group", group.category))
                        .default_open(true)
                        .show(ui, |ui| {
                            for faq in group.faqs {
                                self.show_row(ui, faq, &mut actions);
                            }
                        });
                    }
                });
        }

        for action in actions {
            self.apply(action, &snapshot, cmd_tx, status);
        }
    }

    fn show_row(&mut self, ui: &mut egui::Ui, faq: &Faq, actions: &mut Vec<FaqAction>) {
        let view = self.rows.view_mut(faq.id);
        let pending = view.is_pending();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            match RowMode::of(view.mode()) {
                RowMode::Viewing | RowMode::ConfirmingConvert => {
                    ui.label(egui::RichText::new(&faq.question).strong());
                    ui.label(faq.answer.as_str());
                    ui.horizontal(|ui| {
                        if ui.add_enabled(!pending, egui::Button::new("Edit")).clicked() {
                            actions.push(FaqAction::Edit(faq.id));
                        }
                        if ui.add_enabled(!pending, egui::Button::new("Delete")).clicked() {
                            actions.push(FaqAction::Delete(faq.id));
                        }
                    });
                }
                RowMode::Editing => {
                    if let Some(draft) = view.edit_draft_mut() {
                        ui.add(
                            egui::TextEdit::singleline(&mut draft.question)
                                .hint_text("Question")
                                .desired_width(f32::INFINITY),
                        );
                        ui.add(
                            egui::TextEdit::multiline(&mut draft.answer)
                                .hint_text("Answer")
                                .desired_rows(3)
                                .desired_width(f32::INFINITY),
                        );
                    } else if let ItemMode::Editing(draft) = view.mode() {
                        ui.label(egui::RichText::new(&draft.question).strong());
                        ui.label(draft.answer.as_str());
                    }
                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(view.can_submit(), egui::Button::new("Save"))
                            .clicked()
                        {
                            actions.push(FaqAction::Submit(faq.id));
                        }
                        if ui.add_enabled(!pending, egui::Button::new("Cancel")).clicked() {
                            actions.push(FaqAction::Cancel(faq.id));
                        }
                        if pending {
                            ui.spinner();
                        }
                    });
                }
                RowMode::ConfirmingDelete => {
                    ui.label(egui::RichText::new(&faq.question).strong());
                    ui.label("Delete this FAQ?");
                    ui.horizontal(|ui| {
                        if ui.add_enabled(!pending, egui::Button::new("Delete")).clicked() {
                            actions.push(FaqAction::Submit(faq.id));
                        }
                        if ui.add_enabled(!pending, egui::Button::new("Cancel")).clicked() {
                            actions.push(FaqAction::Cancel(faq.id));
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

    fn apply(
        &mut self,
        action: FaqAction,
        snapshot: &client_core::EntityList<Faq>,
        cmd_tx: &Sender<BackendCommand>,
        status: &mut String,
    ) {
        match action {
            FaqAction::Reload => self.reload(cmd_tx, status),
            FaqAction::OpenAddForm => {
                self.add_form = Some(AddFaqForm::new(category_choices(snapshot.items())));
            }
            FaqAction::CloseAddForm => {
                if !self.add_form.as_ref().is_some_and(AddFaqForm::is_pending) {
                    self.add_form = None;
                }
            }
            FaqAction::SubmitAdd => {
                let Some(form) = self.add_form.as_mut() else {
                    return;
                };
                let Some(fields) = form.begin_submit() else {
                    return;
                };
                let queued = dispatch_backend_command(
                    cmd_tx,
                    BackendCommand::CreateFaq {
                        page: self.token,
                        faqs: self.faqs.handle(),
                        fields,
                    },
                    status,
                );
                if !queued {
                    form.settle(Err(status.clone()));
                }
            }
            FaqAction::Edit(id) => {
                if let Some(faq) = snapshot.get(id) {
                    self.rows.view_mut(id).start_edit(faq);
                }
            }
            FaqAction::Delete(id) => {
                self.rows.view_mut(id).start_delete();
            }
            FaqAction::Cancel(id) => {
                self.rows.view_mut(id).cancel();
            }
            FaqAction::Submit(id) => {
                let Some(submission) = self.rows.view_mut(id).submit() else {
                    return;
                };
                let faqs = self.faqs.handle();
                let page = self.token;
                let cmd = match submission {
                    Submission::Update { id, update } => BackendCommand::UpdateFaq {
                        page,
                        faqs,
                        id,
                        update,
                    },
                    Submission::Delete { id } => BackendCommand::DeleteFaq { page, faqs, id },
                    Submission::Convert { .. } => return,
                };
                if !dispatch_backend_command(cmd_tx, cmd, status) {
                    self.rows.settle(id, Err(status.clone()));
                }
            }
        }
    }
}

fn show_add_form(ui: &mut egui::Ui, form: &mut AddFaqForm, actions: &mut Vec<FaqAction>) {
    let pending = form.is_pending();
    ui.label(egui::RichText::new("New FAQ").strong());
    ui.add_enabled_ui(!pending, |ui| {
        ui.add(
            egui::TextEdit::singleline(&mut form.question)
                .hint_text("Question")
                .desired_width(f32::INFINITY),
        );
        ui.add(
            egui::TextEdit::multiline(&mut form.answer)
                .hint_text("Answer")
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );
        ui.horizontal(|ui| {
            ui.label("Category");
            category_picker(ui, "add_faq_category", &mut form.category);
        });
    });
    ui.horizontal(|ui| {
        if ui
            .add_enabled(form.can_submit(), egui::Button::new("Add"))
            .clicked()
        {
            actions.push(FaqAction::SubmitAdd);
        }
        if ui.add_enabled(!pending, egui::Button::new("Cancel")).clicked() {
            actions.push(FaqAction::CloseAddForm);
        }
        if pending {
            ui.spinner();
        }
    });
    show_item_error(ui, form.last_error());
}

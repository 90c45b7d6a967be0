//! UI layer: app shell, the three pages and the widgets they share.

pub mod app;
pub mod faq_panel;
pub mod unanswered_panel;
pub mod voices_panel;

use client_core::{CategoryPicker, CategorySelection, ItemMode, LoadState};
use eframe::egui;

pub use app::DashboardApp;

const NEW_CATEGORY_LABEL: &str = "New category…";

pub(crate) fn error_color() -> egui::Color32 {
    egui::Color32::from_rgb(200, 80, 80)
}

/// Coarse mode of a row, so rendering can branch without holding a borrow of
/// the row state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowMode {
    Viewing,
    Editing,
    ConfirmingDelete,
    ConfirmingConvert,
}

impl RowMode {
    pub(crate) fn of(mode: &ItemMode) -> Self {
        match mode {
            ItemMode::Viewing => RowMode::Viewing,
            ItemMode::Editing(_) => RowMode::Editing,
            ItemMode::ConfirmingDelete => RowMode::ConfirmingDelete,
            ItemMode::ConfirmingConvert(_) => RowMode::ConfirmingConvert,
        }
    }
}

/// Renders the loading and failure states of a list. Returns true when the
/// list itself should be drawn.
pub(crate) fn show_load_state(
    ui: &mut egui::Ui,
    state: &LoadState,
    is_empty: bool,
    loading_text: &str,
    empty_text: &str,
) -> bool {
    match state {
        LoadState::Loading if is_empty => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(loading_text);
            });
            false
        }
        LoadState::Failed(message) => {
            ui.colored_label(error_color(), message.as_str());
            false
        }
        _ if is_empty => {
            ui.weak(empty_text);
            false
        }
        _ => true,
    }
}

pub(crate) fn show_item_error(ui: &mut egui::Ui, error: Option<&str>) {
    if let Some(message) = error {
        ui.colored_label(error_color(), egui::RichText::new(message).small());
    }
}

/// Drop-down of known categories plus a free-text "new category" entry.
pub(crate) fn category_picker(ui: &mut egui::Ui, id_salt: impl std::hash::Hash, picker: &mut CategoryPicker) {
    let selected_text = match picker.selection() {
        CategorySelection::Existing(name) => name.clone(),
        CategorySelection::New(_) => NEW_CATEGORY_LABEL.to_string(),
    };

    let mut chosen: Option<String> = None;
    let mut start_new = false;
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            for choice in picker.choices() {
                let selected = matches!(
                    picker.selection(),
                    CategorySelection::Existing(name) if name == choice
                );
                if ui.selectable_label(selected, choice.as_str()).clicked() {
                    chosen = Some(choice.clone());
                }
            }
            if ui.selectable_label(picker.is_new(), NEW_CATEGORY_LABEL).clicked() {
                start_new = true;
            }
        });

    if let Some(choice) = chosen {
        picker.select_existing(&choice);
    } else if start_new && !picker.is_new() {
        picker.start_new();
    }

    if let Some(name) = picker.new_name_mut() {
        ui.add(egui::TextEdit::singleline(name).hint_text("Category name"));
    }
}

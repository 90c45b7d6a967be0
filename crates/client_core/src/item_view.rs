//! Per-item interaction state for list rows and the forms that feed the list
//! controllers.
//!
//! Every row owns its own [`ItemView`]; there is no shared "active row". A row
//! with a call in flight rejects further actions until the call settles, which
//! blocks double submission without serializing unrelated rows.

use std::{collections::HashMap, hash::Hash};

use shared::{
    domain::{Faq, Voice, VoiceId, DEFAULT_CATEGORY},
    protocol::{ConvertToFaqRequest, FaqFields, FaqUpdate},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelection {
    Existing(String),
    New(String),
}

/// Choice between one of the known categories and a brand-new name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPicker {
    choices: Vec<String>,
    selection: CategorySelection,
}

impl CategoryPicker {
    pub fn new(choices: Vec<String>) -> Self {
        let choices = if choices.is_empty() {
            vec![DEFAULT_CATEGORY.to_string()]
        } else {
            choices
        };
        let selection = CategorySelection::Existing(choices[0].clone());
        Self { choices, selection }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn selection(&self) -> &CategorySelection {
        &self.selection
    }

    pub fn is_new(&self) -> bool {
        matches!(self.selection, CategorySelection::New(_))
    }

    pub fn select_existing(&mut self, category: &str) {
        if self.choices.iter().any(|choice| choice == category) {
            self.selection = CategorySelection::Existing(category.to_string());
        }
    }

    /// Switches to free-text entry, starting from an empty name.
    pub fn start_new(&mut self) {
        self.selection = CategorySelection::New(String::new());
    }

    pub fn new_name_mut(&mut self) -> Option<&mut String> {
        match &mut self.selection {
            CategorySelection::New(name) => Some(name),
            CategorySelection::Existing(_) => None,
        }
    }

    /// Replaces the offered categories. A selection that is no longer offered
    /// falls back to the first choice; a typed new name is kept.
    pub fn set_choices(&mut self, choices: Vec<String>) {
        let replacement = CategoryPicker::new(choices);
        if let CategorySelection::Existing(current) = &self.selection {
            if !replacement.choices.contains(current) {
                self.selection = replacement.selection.clone();
            }
        }
        self.choices = replacement.choices;
    }

    /// The category to submit, or `None` while a new name is still blank.
    pub fn resolved(&self) -> Option<String> {
        let raw = match &self.selection {
            CategorySelection::Existing(name) | CategorySelection::New(name) => name,
        };
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddFaqForm {
    pub question: String,
    pub answer: String,
    pub category: CategoryPicker,
    pending: bool,
    last_error: Option<String>,
}

impl AddFaqForm {
    pub fn new(choices: Vec<String>) -> Self {
        Self {
            question: String::new(),
            answer: String::new(),
            category: CategoryPicker::new(choices),
            pending: false,
            last_error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.pending
            && !is_blank(&self.question)
            && !is_blank(&self.answer)
            && self.category.resolved().is_some()
    }

    /// Marks the form pending and returns the fields to create, or `None` if
    /// the form is incomplete or already submitting.
    pub fn begin_submit(&mut self) -> Option<FaqFields> {
        if !self.can_submit() {
            return None;
        }
        self.pending = true;
        self.last_error = None;
        Some(FaqFields {
            question: self.question.clone(),
            answer: self.answer.clone(),
            category: self.category.resolved(),
        })
    }

    /// On failure the typed input stays so the user can retry. On success the
    /// owner is expected to close the form.
    pub fn settle(&mut self, result: Result<(), String>) {
        self.pending = false;
        self.last_error = result.err();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqDraft {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertDraft {
    pub answer: String,
    pub category: CategoryPicker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemMode {
    Viewing,
    Editing(FaqDraft),
    ConfirmingDelete,
    ConfirmingConvert(ConvertDraft),
}

/// What a row asks its list controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<Id> {
    Update { id: Id, update: FaqUpdate },
    Delete { id: Id },
    Convert { id: Id, request: ConvertToFaqRequest },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView<Id> {
    id: Id,
    mode: ItemMode,
    pending: bool,
    last_error: Option<String>,
}

impl<Id: Copy> ItemView<Id> {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            mode: ItemMode::Viewing,
            pending: false,
            last_error: None,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn mode(&self) -> &ItemMode {
        &self.mode
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn enter(&mut self, mode: ItemMode) -> bool {
        if self.pending || self.mode != ItemMode::Viewing {
            return false;
        }
        self.mode = mode;
        self.last_error = None;
        true
    }

    pub fn start_edit(&mut self, faq: &Faq) -> bool {
        self.enter(ItemMode::Editing(FaqDraft {
            question: faq.question.clone(),
            answer: faq.answer.clone(),
        }))
    }

    pub fn start_delete(&mut self) -> bool {
        self.enter(ItemMode::ConfirmingDelete)
    }

    pub fn start_convert(&mut self, choices: Vec<String>) -> bool {
        self.enter(ItemMode::ConfirmingConvert(ConvertDraft {
            answer: String::new(),
            category: CategoryPicker::new(choices),
        }))
    }

    /// Back to viewing without any network call. Drafts are discarded, so the
    /// row shows the last known server values again.
    pub fn cancel(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.mode = ItemMode::Viewing;
        self.last_error = None;
        true
    }

    pub fn edit_draft_mut(&mut self) -> Option<&mut FaqDraft> {
        if self.pending {
            return None;
        }
        match &mut self.mode {
            ItemMode::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn convert_draft_mut(&mut self) -> Option<&mut ConvertDraft> {
        if self.pending {
            return None;
        }
        match &mut self.mode {
            ItemMode::ConfirmingConvert(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        if self.pending {
            return false;
        }
        match &self.mode {
            ItemMode::Viewing => false,
            ItemMode::Editing(_) | ItemMode::ConfirmingDelete => true,
            ItemMode::ConfirmingConvert(draft) => {
                !is_blank(&draft.answer) && draft.category.resolved().is_some()
            }
        }
    }

    /// Confirms the active mode. Marks the row pending and returns the call to
    /// make, or `None` when there is nothing valid to submit.
    pub fn submit(&mut self) -> Option<Submission<Id>> {
        if !self.can_submit() {
            return None;
        }
        let submission = match &self.mode {
            ItemMode::Viewing => return None,
            ItemMode::Editing(draft) => Submission::Update {
                id: self.id,
                update: FaqUpdate::text(draft.question.clone(), draft.answer.clone()),
            },
            ItemMode::ConfirmingDelete => Submission::Delete { id: self.id },
            ItemMode::ConfirmingConvert(draft) => Submission::Convert {
                id: self.id,
                request: ConvertToFaqRequest {
                    answer: draft.answer.clone(),
                    category: draft.category.resolved()?,
                },
            },
        };
        self.pending = true;
        self.last_error = None;
        Some(submission)
    }

    /// Applies the outcome of the submitted call. Success returns to viewing
    /// (a deleted or converted row disappears with its record). A failed delete
    /// also returns to viewing; failed edits and conversions keep their draft.
    pub fn settle(&mut self, result: Result<(), String>) {
        self.pending = false;
        match result {
            Ok(()) => {
                self.mode = ItemMode::Viewing;
                self.last_error = None;
            }
            Err(message) => {
                if self.mode == ItemMode::ConfirmingDelete {
                    self.mode = ItemMode::Viewing;
                }
                self.last_error = Some(message);
            }
        }
    }
}

/// Row states of one list, keyed by record id.
#[derive(Debug, Clone)]
pub struct ItemViews<Id> {
    views: HashMap<Id, ItemView<Id>>,
}

impl<Id> Default for ItemViews<Id> {
    fn default() -> Self {
        Self {
            views: HashMap::new(),
        }
    }
}

impl<Id: Copy + Eq + Hash> ItemViews<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Id) -> Option<&ItemView<Id>> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: Id) -> &mut ItemView<Id> {
        self.views.entry(id).or_insert_with(|| ItemView::new(id))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ItemView<Id>> {
        self.views.values_mut()
    }

    pub fn settle(&mut self, id: Id, result: Result<(), String>) {
        if let Some(view) = self.views.get_mut(&id) {
            view.settle(result);
        }
    }

    /// Drops row states whose record is gone.
    pub fn retain_ids(&mut self, live: impl IntoIterator<Item = Id>) {
        let live: Vec<Id> = live.into_iter().collect();
        self.views.retain(|id, _| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// "Set as default" controls for the voice cards. Only one change may be in
/// flight at a time, and it disables every card while it runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultVoiceSelector {
    pending: Option<VoiceId>,
    last_error: Option<(VoiceId, String)>,
}

impl DefaultVoiceSelector {
    pub fn can_set_default(&self, voice: &Voice) -> bool {
        !voice.is_default && self.pending.is_none()
    }

    pub fn is_pending(&self, id: VoiceId) -> bool {
        self.pending == Some(id)
    }

    pub fn any_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error_for(&self, id: VoiceId) -> Option<&str> {
        match &self.last_error {
            Some((voice_id, message)) if *voice_id == id => Some(message),
            _ => None,
        }
    }

    pub fn begin(&mut self, voice: &Voice) -> Option<VoiceId> {
        if !self.can_set_default(voice) {
            return None;
        }
        self.pending = Some(voice.id);
        self.last_error = None;
        Some(voice.id)
    }

    pub fn settle(&mut self, id: VoiceId, result: Result<(), String>) {
        if self.pending == Some(id) {
            self.pending = None;
        }
        self.last_error = result.err().map(|message| (id, message));
    }
}

#[cfg(test)]
#[path = "tests/item_view_tests.rs"]
mod tests;

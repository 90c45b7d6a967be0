//! Client side of the assistant admin dashboard: the REST boundary, list
//! controllers that keep a local copy of each collection in step with the
//! server, per-row interaction state, and voice preview playback.

pub mod api;
pub mod config;
pub mod error;
pub mod faq;
pub mod item_view;
pub mod list;
pub mod preview;
pub mod unanswered;
pub mod voices;

pub use api::{AdminApi, HttpAdminApi};
pub use config::{load_settings, Settings};
pub use error::{ClientError, ClientResult, Operation};
pub use faq::{category_choices, group_by_category, CategoryGroup};
pub use item_view::{
    AddFaqForm, CategoryPicker, CategorySelection, ConvertDraft, DefaultVoiceSelector, FaqDraft,
    ItemMode, ItemView, ItemViews, Submission,
};
pub use list::{Entity, EntityList, ListController, ListHandle, LoadState};
pub use preview::{AudioOutput, PreviewError, PreviewPlayer, PreviewStep};
pub use voices::default_voice;

#[cfg(test)]
#[path = "tests/fake_api.rs"]
pub(crate) mod fake_api;

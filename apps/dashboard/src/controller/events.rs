//! UI/backend events and error modeling for the dashboard controller.

use client_core::{ClientError, Operation, PreviewError};
use shared::domain::{FaqId, QuestionId, VoiceId};

/// One mounting of a page. Commands carry the token of the page that issued
/// them and the resulting events are only accepted by that same mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTarget {
    Faq(FaqId),
    Question(QuestionId),
}

pub enum UiEvent {
    ListLoaded {
        page: PageToken,
        outcome: Result<usize, UiError>,
    },
    CategoryChoices {
        page: PageToken,
        choices: Vec<String>,
    },
    FaqCreated {
        page: PageToken,
        outcome: Result<FaqId, UiError>,
    },
    ItemSettled {
        page: PageToken,
        target: ItemTarget,
        outcome: Result<(), UiError>,
    },
    DefaultVoiceSettled {
        page: PageToken,
        voice: VoiceId,
        outcome: Result<(), UiError>,
    },
    PreviewFetched {
        page: PageToken,
        model: String,
        outcome: Result<Vec<u8>, PreviewError>,
    },
    /// Not tied to a page, e.g. the backend worker failing to start.
    Error(UiError),
}

impl UiEvent {
    pub fn page(&self) -> Option<PageToken> {
        match self {
            UiEvent::ListLoaded { page, .. }
            | UiEvent::CategoryChoices { page, .. }
            | UiEvent::FaqCreated { page, .. }
            | UiEvent::ItemSettled { page, .. }
            | UiEvent::DefaultVoiceSettled { page, .. }
            | UiEvent::PreviewFetched { page, .. } => Some(*page),
            UiEvent::Error(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Server,
    Transport,
    Protocol,
    Validation,
    Startup,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    operation: Option<Operation>,
    message: String,
}

impl UiError {
    /// Keeps the operation's fixed message for display. The underlying cause
    /// only goes to the log.
    pub fn from_client(err: &ClientError) -> Self {
        let category = match err {
            ClientError::Status { .. } => UiErrorCategory::Server,
            ClientError::Transport { .. } => UiErrorCategory::Transport,
            ClientError::Decode { .. } => UiErrorCategory::Protocol,
            ClientError::MissingRecord { .. } => UiErrorCategory::Validation,
        };
        tracing::warn!(operation = err.operation().name(), error = %err.detail(), "backend call failed");
        Self {
            category,
            operation: Some(err.operation()),
            message: err.to_string(),
        }
    }

    pub fn startup(message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Startup,
            operation: None,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

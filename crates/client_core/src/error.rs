use reqwest::StatusCode;
use thiserror::Error;

/// Every backend call the dashboard makes. Used to name failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadFaqs,
    CreateFaq,
    UpdateFaq,
    DeleteFaq,
    LoadQuestions,
    ConvertQuestion,
    DeleteQuestion,
    LoadVoices,
    SetDefaultVoice,
    LoadPreview,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::LoadFaqs => "Failed to fetch FAQs",
            Operation::CreateFaq => "Failed to add FAQ",
            Operation::UpdateFaq => "Failed to update FAQ",
            Operation::DeleteFaq => "Failed to delete FAQ",
            Operation::LoadQuestions => "Failed to fetch unanswered questions",
            Operation::ConvertQuestion => "Failed to convert to FAQ",
            Operation::DeleteQuestion => "Failed to delete question",
            Operation::LoadVoices => "Failed to fetch voices",
            Operation::SetDefaultVoice => "Failed to set default voice",
            Operation::LoadPreview => "Failed to load preview",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::LoadFaqs => "load_faqs",
            Operation::CreateFaq => "create_faq",
            Operation::UpdateFaq => "update_faq",
            Operation::DeleteFaq => "delete_faq",
            Operation::LoadQuestions => "load_questions",
            Operation::ConvertQuestion => "convert_question",
            Operation::DeleteQuestion => "delete_question",
            Operation::LoadVoices => "load_voices",
            Operation::SetDefaultVoice => "set_default_voice",
            Operation::LoadPreview => "load_preview",
        }
    }
}

/// Failure of a single backend call. The display text is the fixed message for
/// the operation; the cause is available through `source()` for logging.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{}", .op.failure_message())]
    Status { op: Operation, status: StatusCode },
    #[error("{}", .op.failure_message())]
    Transport {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{}", .op.failure_message())]
    Decode {
        op: Operation,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}", .op.failure_message())]
    MissingRecord { op: Operation, id: i64 },
}

impl ClientError {
    pub fn operation(&self) -> Operation {
        match self {
            ClientError::Status { op, .. }
            | ClientError::Transport { op, .. }
            | ClientError::Decode { op, .. }
            | ClientError::MissingRecord { op, .. } => *op,
        }
    }

    /// One-line description including the cause, for log lines.
    pub fn detail(&self) -> String {
        match self {
            ClientError::Status { op, status } => {
                format!("{}: server returned {status}", op.failure_message())
            }
            ClientError::Transport { op, source } => {
                format!("{}: {source}", op.failure_message())
            }
            ClientError::Decode { op, source } => {
                format!("{}: malformed response: {source}", op.failure_message())
            }
            ClientError::MissingRecord { op, id } => {
                format!("{}: no loaded record with id {id}", op.failure_message())
            }
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

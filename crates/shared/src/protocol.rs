use serde::{Deserialize, Serialize};

/// Body of `POST /api/faq` and `PUT /api/faq/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqFields {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
}

/// Partial FAQ edit. `None` fields keep the record's current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
}

impl FaqUpdate {
    pub fn text(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            answer: Some(answer.into()),
            category: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.answer.is_none() && self.category.is_none()
    }
}

/// Body of `POST /api/unansweredquestion/{id}/convert-to-faq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertToFaqRequest {
    pub answer: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewQuery {
    pub model: String,
}

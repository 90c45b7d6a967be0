use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category key used for FAQs that carry no category of their own.
pub const DEFAULT_CATEGORY: &str = "general";

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(FaqId);
id_newtype!(QuestionId);
id_newtype!(VoiceId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: FaqId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Faq {
    /// Grouping key: the stored category, or [`DEFAULT_CATEGORY`] when it is
    /// missing or empty.
    pub fn category_key(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => DEFAULT_CATEGORY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnansweredQuestion {
    pub id: QuestionId,
    pub question: String,
    pub frequency: u32,
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub reviewed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub id: VoiceId,
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_default: bool,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_voice_payload() {
        let voice: Voice = serde_json::from_str(
            r#"{"id":4,"name":"Aria","model":"aura-asteria-en","description":null,"isDefault":true,"createdAt":"2024-05-01T09:30:00"}"#,
        )
        .expect("voice");
        assert_eq!(voice.id, VoiceId(4));
        assert!(voice.is_default);
        assert!(voice.description.is_none());
    }

    #[test]
    fn empty_or_missing_category_falls_back_to_general() {
        let mut faq: Faq = serde_json::from_str(
            r#"{"id":1,"question":"Breakfast?","answer":"7-10am","createdAt":"2024-05-01T09:30:00Z"}"#,
        )
        .expect("faq");
        assert_eq!(faq.category_key(), DEFAULT_CATEGORY);

        faq.category = Some(String::new());
        assert_eq!(faq.category_key(), DEFAULT_CATEGORY);

        faq.category = Some("dining".into());
        assert_eq!(faq.category_key(), "dining");
    }
}

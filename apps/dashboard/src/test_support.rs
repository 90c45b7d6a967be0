//! Canned backend for the dashboard's own tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::Utc;
use client_core::{AdminApi, ClientError, ClientResult, Operation};
use shared::{
    domain::{Faq, FaqId, QuestionId, UnansweredQuestion, Voice, VoiceId},
    protocol::{ConvertToFaqRequest, FaqFields},
};

#[derive(Default)]
pub struct CannedApi {
    pub faqs: Mutex<Vec<Faq>>,
    pub voices: Mutex<Vec<Voice>>,
    pub reject_mutations: AtomicBool,
}

pub fn faq(id: i64, category: &str) -> Faq {
    Faq {
        id: FaqId(id),
        question: format!("question {id}"),
        answer: format!("answer {id}"),
        category: Some(category.to_string()),
        created_at: Utc::now(),
    }
}

pub fn voice(id: i64, model: &str, is_default: bool) -> Voice {
    Voice {
        id: VoiceId(id),
        name: format!("voice {id}"),
        model: model.to_string(),
        description: None,
        is_default,
        created_at: Utc::now(),
    }
}

impl CannedApi {
    pub fn with_faqs(faqs: Vec<Faq>) -> Self {
        Self {
            faqs: Mutex::new(faqs),
            ..Self::default()
        }
    }

    fn check(&self, op: Operation) -> ClientResult<()> {
        if self.reject_mutations.load(Ordering::SeqCst) {
            return Err(ClientError::MissingRecord { op, id: 0 });
        }
        Ok(())
    }
}

#[async_trait]
impl AdminApi for CannedApi {
    async fn list_faqs(&self) -> ClientResult<Vec<Faq>> {
        Ok(self.faqs.lock().expect("faqs").clone())
    }

    async fn create_faq(&self, fields: &FaqFields) -> ClientResult<Faq> {
        self.check(Operation::CreateFaq)?;
        let mut faqs = self.faqs.lock().expect("faqs");
        let created = Faq {
            id: FaqId(faqs.len() as i64 + 100),
            question: fields.question.clone(),
            answer: fields.answer.clone(),
            category: fields.category.clone(),
            created_at: Utc::now(),
        };
        faqs.insert(0, created.clone());
        Ok(created)
    }

    async fn update_faq(&self, _id: FaqId, _fields: &FaqFields) -> ClientResult<()> {
        self.check(Operation::UpdateFaq)
    }

    async fn delete_faq(&self, id: FaqId) -> ClientResult<()> {
        self.check(Operation::DeleteFaq)?;
        self.faqs.lock().expect("faqs").retain(|faq| faq.id != id);
        Ok(())
    }

    async fn list_questions(&self) -> ClientResult<Vec<UnansweredQuestion>> {
        Ok(vec![UnansweredQuestion {
            id: QuestionId(1),
            question: "Is there parking?".into(),
            frequency: 3,
            timestamp: Utc::now(),
            reviewed: false,
        }])
    }

    async fn convert_question(
        &self,
        _id: QuestionId,
        _request: &ConvertToFaqRequest,
    ) -> ClientResult<()> {
        self.check(Operation::ConvertQuestion)
    }

    async fn delete_question(&self, _id: QuestionId) -> ClientResult<()> {
        self.check(Operation::DeleteQuestion)
    }

    async fn list_voices(&self) -> ClientResult<Vec<Voice>> {
        Ok(self.voices.lock().expect("voices").clone())
    }

    async fn set_default_voice(&self, _id: VoiceId) -> ClientResult<()> {
        self.check(Operation::SetDefaultVoice)
    }

    async fn fetch_preview(&self, model: &str) -> ClientResult<Vec<u8>> {
        Ok(model.as_bytes().to_vec())
    }
}

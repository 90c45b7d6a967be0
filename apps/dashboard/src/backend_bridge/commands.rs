//! Backend commands queued from UI to backend worker.

use client_core::ListHandle;
use shared::{
    domain::{Faq, FaqId, QuestionId, UnansweredQuestion, Voice, VoiceId},
    protocol::{ConvertToFaqRequest, FaqFields, FaqUpdate},
};

use crate::controller::events::PageToken;

pub enum BackendCommand {
    LoadFaqs {
        page: PageToken,
        faqs: ListHandle<Faq>,
    },
    CreateFaq {
        page: PageToken,
        faqs: ListHandle<Faq>,
        fields: FaqFields,
    },
    UpdateFaq {
        page: PageToken,
        faqs: ListHandle<Faq>,
        id: FaqId,
        update: FaqUpdate,
    },
    DeleteFaq {
        page: PageToken,
        faqs: ListHandle<Faq>,
        id: FaqId,
    },
    /// Loads the questions together with the category choices for converting.
    LoadQuestions {
        page: PageToken,
        questions: ListHandle<UnansweredQuestion>,
    },
    ConvertQuestion {
        page: PageToken,
        questions: ListHandle<UnansweredQuestion>,
        id: QuestionId,
        request: ConvertToFaqRequest,
    },
    DeleteQuestion {
        page: PageToken,
        questions: ListHandle<UnansweredQuestion>,
        id: QuestionId,
    },
    LoadVoices {
        page: PageToken,
        voices: ListHandle<Voice>,
    },
    SetDefaultVoice {
        page: PageToken,
        voices: ListHandle<Voice>,
        id: VoiceId,
    },
    FetchPreview {
        page: PageToken,
        model: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadFaqs { .. } => "load_faqs",
            BackendCommand::CreateFaq { .. } => "create_faq",
            BackendCommand::UpdateFaq { .. } => "update_faq",
            BackendCommand::DeleteFaq { .. } => "delete_faq",
            BackendCommand::LoadQuestions { .. } => "load_questions",
            BackendCommand::ConvertQuestion { .. } => "convert_question",
            BackendCommand::DeleteQuestion { .. } => "delete_question",
            BackendCommand::LoadVoices { .. } => "load_voices",
            BackendCommand::SetDefaultVoice { .. } => "set_default_voice",
            BackendCommand::FetchPreview { .. } => "fetch_preview",
        }
    }

    pub fn page(&self) -> PageToken {
        match self {
            BackendCommand::LoadFaqs { page, .. }
            | BackendCommand::CreateFaq { page, .. }
            | BackendCommand::UpdateFaq { page, .. }
            | BackendCommand::DeleteFaq { page, .. }
            | BackendCommand::LoadQuestions { page, .. }
            | BackendCommand::ConvertQuestion { page, .. }
            | BackendCommand::DeleteQuestion { page, .. }
            | BackendCommand::LoadVoices { page, .. }
            | BackendCommand::SetDefaultVoice { page, .. }
            | BackendCommand::FetchPreview { page, .. } => *page,
        }
    }
}

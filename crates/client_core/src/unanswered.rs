use shared::{
    domain::{QuestionId, UnansweredQuestion, DEFAULT_CATEGORY},
    protocol::ConvertToFaqRequest,
};
use tracing::{debug, info};

use crate::{
    error::{ClientResult, Operation},
    faq::category_choices,
    list::ListHandle,
};

impl ListHandle<UnansweredQuestion> {
    pub async fn load(&self) -> ClientResult<usize> {
        self.load_with(Operation::LoadQuestions, self.api().list_questions())
            .await
    }

    /// Turns the question into a FAQ server-side and drops it locally. The FAQ
    /// list picks up the new entry on its own next load.
    pub async fn convert(&self, id: QuestionId, request: ConvertToFaqRequest) -> ClientResult<()> {
        self.api().convert_question(id, &request).await?;
        info!(question_id = id.0, category = %request.category, "question converted to faq");
        self.apply(Operation::ConvertQuestion, |list| list.remove(id));
        Ok(())
    }

    pub async fn delete(&self, id: QuestionId) -> ClientResult<()> {
        self.api().delete_question(id).await?;
        info!(question_id = id.0, "question deleted");
        self.apply(Operation::DeleteQuestion, |list| list.remove(id));
        Ok(())
    }

    /// Category choices for the convert form, taken from the current FAQs.
    /// Best effort: any failure yields just the fallback category.
    pub async fn category_choices(&self) -> Vec<String> {
        match self.api().list_faqs().await {
            Ok(faqs) => category_choices(&faqs),
            Err(err) => {
                debug!(error = %err.detail(), "category lookup failed; using fallback");
                vec![DEFAULT_CATEGORY.to_string()]
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/unanswered_tests.rs"]
mod tests;

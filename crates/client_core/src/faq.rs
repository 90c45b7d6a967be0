use shared::{
    domain::{Faq, FaqId, DEFAULT_CATEGORY},
    protocol::{FaqFields, FaqUpdate},
};
use tracing::info;

use crate::{
    error::{ClientError, ClientResult, Operation},
    list::ListHandle,
};

impl ListHandle<Faq> {
    pub async fn load(&self) -> ClientResult<usize> {
        self.load_with(Operation::LoadFaqs, self.api().list_faqs())
            .await
    }

    /// Creates a FAQ and puts the server's copy (with its assigned id) first.
    pub async fn create(&self, fields: FaqFields) -> ClientResult<Faq> {
        let op = Operation::CreateFaq;
        let created = self.api().create_faq(&fields).await?;
        info!(faq_id = created.id.0, category = created.category_key(), "faq created");
        let stored = created.clone();
        self.apply(op, |list| list.prepend(stored));
        Ok(created)
    }

    /// Sends the full record with `update` applied and then merges only the
    /// changed fields locally.
    pub async fn update(&self, id: FaqId, update: FaqUpdate) -> ClientResult<()> {
        let op = Operation::UpdateFaq;
        let current = self
            .read(|list| list.get(id).cloned())
            .flatten()
            .ok_or(ClientError::MissingRecord { op, id: id.0 })?;

        let body = FaqFields {
            question: update.question.clone().unwrap_or(current.question),
            answer: update.answer.clone().unwrap_or(current.answer),
            category: update.category.clone().or(current.category),
        };
        self.api().update_faq(id, &body).await?;
        info!(faq_id = id.0, "faq updated");

        self.apply(op, |list| {
            list.patch(id, |faq| {
                if let Some(question) = update.question {
                    faq.question = question;
                }
                if let Some(answer) = update.answer {
                    faq.answer = answer;
                }
                if let Some(category) = update.category {
                    faq.category = Some(category);
                }
            })
        });
        Ok(())
    }

    pub async fn delete(&self, id: FaqId) -> ClientResult<()> {
        self.api().delete_faq(id).await?;
        info!(faq_id = id.0, "faq deleted");
        self.apply(Operation::DeleteFaq, |list| list.remove(id));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub faqs: Vec<&'a Faq>,
}

/// Partitions FAQs by [`Faq::category_key`]. Groups appear in first-seen
/// order of a left-to-right scan and members keep their relative order.
pub fn group_by_category(faqs: &[Faq]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    for faq in faqs {
        let key = faq.category_key();
        match groups.iter_mut().find(|group| group.category == key) {
            Some(group) => group.faqs.push(faq),
            None => groups.push(CategoryGroup {
                category: key,
                faqs: vec![faq],
            }),
        }
    }
    groups
}

/// Distinct category keys in first-seen order, or just the fallback category
/// when there are no FAQs yet.
pub fn category_choices(faqs: &[Faq]) -> Vec<String> {
    let mut choices: Vec<String> = Vec::new();
    for faq in faqs {
        let key = faq.category_key();
        if !choices.iter().any(|existing| existing == key) {
            choices.push(key.to_string());
        }
    }
    if choices.is_empty() {
        choices.push(DEFAULT_CATEGORY.to_string());
    }
    choices
}

#[cfg(test)]
#[path = "tests/faq_tests.rs"]
mod tests;

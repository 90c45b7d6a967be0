use std::sync::Arc;

use shared::{
    domain::{Faq, QuestionId, UnansweredQuestion},
    protocol::ConvertToFaqRequest,
};

use super::*;
use crate::{
    fake_api::{faq, question, FakeAdminApi},
    list::ListController,
};

async fn loaded(api: Arc<FakeAdminApi>) -> ListController<UnansweredQuestion> {
    let controller = ListController::<UnansweredQuestion>::new(api);
    controller.handle().load().await.expect("load questions");
    controller
}

fn ids(questions: &[UnansweredQuestion]) -> Vec<i64> {
    questions.iter().map(|question| question.id.0).collect()
}

#[tokio::test]
async fn convert_removes_question_but_not_from_faq_list() {
    let api = Arc::new(
        FakeAdminApi::new()
            .with_faqs(vec![faq(1, Some("rooms"))])
            .with_questions(vec![
                question(10, "Is there parking?", 3),
                question(11, "Do you allow pets?", 1),
            ]),
    );
    let faqs = ListController::<Faq>::new(api.clone());
    faqs.handle().load().await.expect("load faqs");
    let questions = loaded(api.clone()).await;

    questions
        .handle()
        .convert(
            QuestionId(10),
            ConvertToFaqRequest {
                answer: "Yes, free on site.".into(),
                category: "facilities".into(),
            },
        )
        .await
        .expect("convert");

    assert_eq!(ids(&questions.items()), vec![11]);
    assert_eq!(faqs.items().len(), 1, "faq view refreshes on its own load");

    faqs.handle().load().await.expect("reload faqs");
    let created = &faqs.items()[0];
    assert_eq!(created.question, "Is there parking?");
    assert_eq!(created.category.as_deref(), Some("facilities"));
}

#[tokio::test]
async fn failed_convert_keeps_question() {
    let api = Arc::new(FakeAdminApi::new().with_questions(vec![question(10, "Parking?", 2)]));
    api.fail(Operation::ConvertQuestion);
    let questions = loaded(api.clone()).await;

    let err = questions
        .handle()
        .convert(
            QuestionId(10),
            ConvertToFaqRequest {
                answer: "Yes".into(),
                category: "general".into(),
            },
        )
        .await
        .expect_err("convert should fail");

    assert_eq!(err.to_string(), "Failed to convert to FAQ");
    assert_eq!(ids(&questions.items()), vec![10]);
}

#[tokio::test]
async fn delete_removes_only_that_question() {
    let api = Arc::new(FakeAdminApi::new().with_questions(vec![
        question(1, "a", 1),
        question(2, "b", 5),
        question(3, "c", 2),
    ]));
    let questions = loaded(api).await;

    questions.handle().delete(QuestionId(2)).await.expect("delete");

    assert_eq!(ids(&questions.items()), vec![1, 3]);
    assert_eq!(questions.items()[1].frequency, 2);
}

#[tokio::test]
async fn failed_delete_keeps_question_and_names_the_operation() {
    let api = Arc::new(FakeAdminApi::new().with_questions(vec![
        question(1, "a", 1),
        question(2, "b", 5),
    ]));
    api.fail(Operation::DeleteQuestion);
    let questions = loaded(api.clone()).await;

    let err = questions
        .handle()
        .delete(QuestionId(2))
        .await
        .expect_err("delete should fail");

    assert_eq!(err.to_string(), "Failed to delete question");
    assert_eq!(ids(&questions.items()), vec![1, 2]);
    assert_eq!(api.call_count(Operation::DeleteQuestion), 1);
}

#[tokio::test]
async fn failed_load_reports_fixed_message() {
    let api = Arc::new(FakeAdminApi::new());
    api.fail(Operation::LoadQuestions);
    let questions = ListController::<UnansweredQuestion>::new(api);

    let err = questions.handle().load().await.expect_err("load fails");

    assert_eq!(err.to_string(), "Failed to fetch unanswered questions");
}

#[tokio::test]
async fn category_choices_come_from_current_faqs() {
    let api = Arc::new(
        FakeAdminApi::new().with_faqs(vec![faq(1, Some("spa")), faq(2, None), faq(3, Some("spa"))]),
    );
    let questions = ListController::<UnansweredQuestion>::new(api);

    let choices = questions.handle().category_choices().await;

    assert_eq!(choices, vec!["spa".to_string(), "general".to_string()]);
}

#[tokio::test]
async fn category_lookup_failure_falls_back_to_general() {
    let api = Arc::new(FakeAdminApi::new().with_faqs(vec![faq(1, Some("spa"))]));
    api.fail(Operation::LoadFaqs);
    let questions = ListController::<UnansweredQuestion>::new(api);

    assert_eq!(
        questions.handle().category_choices().await,
        vec!["general".to_string()]
    );
}

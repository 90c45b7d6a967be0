use std::sync::Arc;

use shared::domain::{Faq, FaqId};

use super::*;
use crate::fake_api::{faq, FakeAdminApi};

fn ids(items: &[Faq]) -> Vec<i64> {
    items.iter().map(|faq| faq.id.0).collect()
}

#[test]
fn new_list_starts_loading_and_empty() {
    let list: EntityList<Faq> = EntityList::new();
    assert_eq!(list.load_state(), &LoadState::Loading);
    assert!(list.is_empty());
}

#[test]
fn prepend_puts_item_first() {
    let mut list = EntityList::new();
    list.replace_all(vec![faq(1, None), faq(2, None)]);
    list.prepend(faq(3, None));
    assert_eq!(ids(list.items()), vec![3, 1, 2]);
}

#[test]
fn remove_keeps_order_of_remaining_items() {
    let mut list = EntityList::new();
    list.replace_all(vec![faq(1, None), faq(2, None), faq(3, None), faq(4, None)]);
    let untouched: Vec<Faq> = list
        .items()
        .iter()
        .filter(|faq| faq.id != FaqId(2))
        .cloned()
        .collect();

    assert!(list.remove(FaqId(2)));
    assert_eq!(list.items(), untouched.as_slice());
    assert!(!list.remove(FaqId(2)));
}

#[test]
fn patch_of_missing_id_is_a_no_op() {
    let mut list = EntityList::new();
    list.replace_all(vec![faq(1, None)]);
    let before = list.items().to_vec();

    assert!(!list.patch(FaqId(9), |faq| faq.answer = "changed".into()));
    assert_eq!(list.items(), before.as_slice());
}

#[test]
fn failed_fetch_keeps_existing_items() {
    let mut list = EntityList::new();
    list.replace_all(vec![faq(1, None)]);
    list.mark_failed("Failed to fetch FAQs");

    assert_eq!(
        list.load_state(),
        &LoadState::Failed("Failed to fetch FAQs".into())
    );
    assert_eq!(ids(list.items()), vec![1]);
}

#[tokio::test]
async fn load_failure_sets_error_state_without_items() {
    let api = Arc::new(FakeAdminApi::new().with_faqs(vec![faq(1, None)]));
    api.fail(Operation::LoadFaqs);
    let controller: ListController<Faq> = ListController::new(api.clone());

    let err = controller.handle().load().await.expect_err("load should fail");

    assert_eq!(err.to_string(), "Failed to fetch FAQs");
    assert_eq!(
        controller.load_state(),
        LoadState::Failed("Failed to fetch FAQs".into())
    );
    assert!(controller.items().is_empty());
}

#[tokio::test]
async fn reload_after_failure_recovers() {
    let api = Arc::new(FakeAdminApi::new().with_faqs(vec![faq(1, None), faq(2, None)]));
    api.fail(Operation::LoadFaqs);
    let controller: ListController<Faq> = ListController::new(api.clone());
    let _ = controller.handle().load().await;

    api.recover(Operation::LoadFaqs);
    let count = controller.handle().load().await.expect("reload");

    assert_eq!(count, 2);
    assert_eq!(controller.load_state(), LoadState::Ready);
    assert_eq!(ids(&controller.items()), vec![1, 2]);
}

#[tokio::test]
async fn handle_outliving_its_controller_drops_results_quietly() {
    let api = Arc::new(FakeAdminApi::new().with_faqs(vec![faq(1, None)]));
    let controller: ListController<Faq> = ListController::new(api.clone());
    let handle = controller.handle();
    assert!(handle.is_attached());

    drop(controller);
    assert!(!handle.is_attached());

    assert_eq!(handle.load().await.expect("load still succeeds"), 1);
    handle.delete(FaqId(1)).await.expect("delete still succeeds");
    assert!(api.server_faqs().is_empty());
}

#[tokio::test]
async fn response_arriving_after_unmount_is_benign() {
    let api = Arc::new(FakeAdminApi::new().with_faqs(vec![faq(1, None)]));
    api.delay(Operation::LoadFaqs, std::time::Duration::from_millis(30));
    let controller: ListController<Faq> = ListController::new(api.clone());
    let handle = controller.handle();

    let pending = tokio::spawn(async move { handle.load().await });
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    drop(controller);

    let outcome = pending.await.expect("task should not panic");
    assert!(outcome.is_ok());
}

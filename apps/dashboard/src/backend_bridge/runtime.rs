//! Runtime bridge between UI command queue and backend event intake.
//!
//! The worker thread owns a multi-threaded tokio runtime and spawns one task
//! per command, so unrelated calls run side by side and may finish in any
//! order. Every task reports back with exactly one event per outcome.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

use client_core::{AdminApi, PreviewError};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::time::Instant;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{ItemTarget, UiError, UiEvent},
};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    api: Arc<dyn AdminApi>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("dashboard-backend".into())
        .spawn(move || run_worker(cmd_rx, ui_tx, api))
}

fn run_worker(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, api: Arc<dyn AdminApi>) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            deliver_now(
                &ui_tx,
                UiEvent::Error(UiError::startup(format!(
                    "backend worker startup failure: failed to build runtime: {err}"
                ))),
            );
            return;
        }
    };

    tracing::info!("backend worker started");
    while let Ok(cmd) = cmd_rx.recv() {
        let ui_tx = ui_tx.clone();
        let api = Arc::clone(&api);
        runtime.spawn(async move { execute(cmd, api.as_ref(), &ui_tx).await });
    }
    tracing::info!("command queue closed; backend worker stopping");
}

pub(crate) async fn execute(cmd: BackendCommand, api: &dyn AdminApi, ui_tx: &Sender<UiEvent>) {
    let failed = |err: client_core::ClientError| UiError::from_client(&err);

    let event = match cmd {
        BackendCommand::LoadFaqs { page, faqs } => UiEvent::ListLoaded {
            page,
            outcome: faqs.load().await.map_err(failed),
        },
        BackendCommand::CreateFaq { page, faqs, fields } => UiEvent::FaqCreated {
            page,
            outcome: faqs.create(fields).await.map(|faq| faq.id).map_err(failed),
        },
        BackendCommand::UpdateFaq {
            page,
            faqs,
            id,
            update,
        } => UiEvent::ItemSettled {
            page,
            target: ItemTarget::Faq(id),
            outcome: faqs.update(id, update).await.map_err(failed),
        },
        BackendCommand::DeleteFaq { page, faqs, id } => UiEvent::ItemSettled {
            page,
            target: ItemTarget::Faq(id),
            outcome: faqs.delete(id).await.map_err(failed),
        },
        BackendCommand::LoadQuestions { page, questions } => {
            let (loaded, choices) =
                futures::join!(questions.load(), questions.category_choices());
            deliver(ui_tx, UiEvent::CategoryChoices { page, choices }).await;
            UiEvent::ListLoaded {
                page,
                outcome: loaded.map_err(failed),
            }
        }
        BackendCommand::ConvertQuestion {
            page,
            questions,
            id,
            request,
        } => UiEvent::ItemSettled {
            page,
            target: ItemTarget::Question(id),
            outcome: questions.convert(id, request).await.map_err(failed),
        },
        BackendCommand::DeleteQuestion {
            page,
            questions,
            id,
        } => UiEvent::ItemSettled {
            page,
            target: ItemTarget::Question(id),
            outcome: questions.delete(id).await.map_err(failed),
        },
        BackendCommand::LoadVoices { page, voices } => UiEvent::ListLoaded {
            page,
            outcome: voices.load().await.map_err(failed),
        },
        BackendCommand::SetDefaultVoice { page, voices, id } => UiEvent::DefaultVoiceSettled {
            page,
            voice: id,
            outcome: voices.set_default(id).await.map_err(failed),
        },
        BackendCommand::FetchPreview { page, model } => {
            let outcome = api.fetch_preview(&model).await.map_err(PreviewError::from);
            UiEvent::PreviewFetched {
                page,
                model,
                outcome,
            }
        }
    };
    deliver(ui_tx, event).await;
}

/// How long a task keeps retrying a full event queue before it gives up on
/// the event.
const DELIVERY_DEADLINE: Duration = Duration::from_secs(30);
const DELIVERY_RETRY: Duration = Duration::from_millis(20);

async fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    let deadline = Instant::now() + DELIVERY_DEADLINE;
    let mut event = event;
    let mut retries = 0u32;
    loop {
        match ui_tx.try_send(event) {
            Ok(()) => {
                if retries > 0 {
                    tracing::debug!(retries, "backend->ui event delivered after queue drained");
                }
                return;
            }
            Err(TrySendError::Full(returned)) => {
                if Instant::now() >= deadline {
                    tracing::error!(
                        page = returned.page().map(|page| page.0),
                        "backend->ui event queue stayed full; dropping event"
                    );
                    return;
                }
                if retries == 0 {
                    tracing::warn!("backend->ui event queue is full; waiting for the ui");
                }
                retries += 1;
                event = returned;
                tokio::time::sleep(DELIVERY_RETRY).await;
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("ui closed; dropping backend event");
                return;
            }
        }
    }
}

/// Used before the runtime exists.
fn deliver_now(ui_tx: &Sender<UiEvent>, event: UiEvent) {
    if let Err(err) = ui_tx.try_send(event) {
        tracing::error!("could not report backend startup failure: {err}");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use client_core::ListController;
    use crossbeam_channel::bounded;
    use shared::domain::{Faq, FaqId, UnansweredQuestion};

    use super::*;
    use crate::{
        controller::events::PageToken,
        test_support::{faq, CannedApi},
    };

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn worker_loads_through_handle_and_reports_page() {
        let api: Arc<dyn AdminApi> = Arc::new(CannedApi::with_faqs(vec![faq(1, "rooms")]));
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let worker = launch(cmd_rx, ui_tx, Arc::clone(&api)).expect("spawn worker");
        let faqs = ListController::<Faq>::new(api);

        cmd_tx
            .send(BackendCommand::LoadFaqs {
                page: PageToken(4),
                faqs: faqs.handle(),
            })
            .expect("queue");

        match ui_rx.recv_timeout(WAIT).expect("event") {
            UiEvent::ListLoaded { page, outcome } => {
                assert_eq!(page, PageToken(4));
                assert_eq!(outcome.expect("loaded"), 1);
            }
            _ => panic!("unexpected event"),
        }
        assert_eq!(faqs.items()[0].id, FaqId(1));

        drop(cmd_tx);
        worker.join().expect("worker exits once the queue closes");
    }

    #[test]
    fn question_load_also_reports_category_choices() {
        let api: Arc<dyn AdminApi> = Arc::new(CannedApi::with_faqs(vec![
            faq(1, "rooms"),
            faq(2, "spa"),
        ]));
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let _worker = launch(cmd_rx, ui_tx, Arc::clone(&api)).expect("spawn worker");
        let questions = ListController::<UnansweredQuestion>::new(api);

        cmd_tx
            .send(BackendCommand::LoadQuestions {
                page: PageToken(1),
                questions: questions.handle(),
            })
            .expect("queue");

        let mut saw_choices = false;
        let mut saw_load = false;
        for _ in 0..2 {
            match ui_rx.recv_timeout(WAIT).expect("event") {
                UiEvent::CategoryChoices { choices, .. } => {
                    assert_eq!(choices, vec!["rooms".to_string(), "spa".to_string()]);
                    saw_choices = true;
                }
                UiEvent::ListLoaded { outcome, .. } => {
                    assert!(outcome.is_ok());
                    saw_load = true;
                }
                _ => panic!("unexpected event"),
            }
        }
        assert!(saw_choices && saw_load);
    }

    #[test]
    fn mutation_failure_carries_fixed_message() {
        let canned = CannedApi::with_faqs(vec![faq(1, "rooms")]);
        canned
            .reject_mutations
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let api: Arc<dyn AdminApi> = Arc::new(canned);
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let _worker = launch(cmd_rx, ui_tx, Arc::clone(&api)).expect("spawn worker");
        let faqs = ListController::<Faq>::new(api);

        cmd_tx
            .send(BackendCommand::DeleteFaq {
                page: PageToken(2),
                faqs: faqs.handle(),
                id: FaqId(1),
            })
            .expect("queue");

        match ui_rx.recv_timeout(WAIT).expect("event") {
            UiEvent::ItemSettled {
                target, outcome, ..
            } => {
                assert_eq!(target, ItemTarget::Faq(FaqId(1)));
                assert_eq!(outcome.expect_err("rejected").message(), "Failed to delete FAQ");
            }
            _ => panic!("unexpected event"),
        }
    }

    #[test]
    fn preview_bytes_come_back_with_model() {
        let api: Arc<dyn AdminApi> = Arc::new(CannedApi::default());
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let _worker = launch(cmd_rx, ui_tx, api).expect("spawn worker");

        cmd_tx
            .send(BackendCommand::FetchPreview {
                page: PageToken(9),
                model: "aura-luna-en".into(),
            })
            .expect("queue");

        match ui_rx.recv_timeout(WAIT).expect("event") {
            UiEvent::PreviewFetched {
                page,
                model,
                outcome,
            } => {
                assert_eq!(page, PageToken(9));
                assert_eq!(model, "aura-luna-en");
                assert_eq!(outcome.expect("bytes"), b"aura-luna-en".to_vec());
            }
            _ => panic!("unexpected event"),
        }
    }

    #[test]
    fn settle_event_waits_for_a_full_queue_to_drain() {
        let api: Arc<dyn AdminApi> = Arc::new(CannedApi::with_faqs(vec![faq(1, "rooms")]));
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(1);
        ui_tx
            .send(UiEvent::Error(UiError::startup("queue filler")))
            .expect("fill");
        let _worker = launch(cmd_rx, ui_tx, Arc::clone(&api)).expect("spawn worker");
        let faqs = ListController::<Faq>::new(api);

        cmd_tx
            .send(BackendCommand::DeleteFaq {
                page: PageToken(6),
                faqs: faqs.handle(),
                id: FaqId(1),
            })
            .expect("queue");
        thread::sleep(Duration::from_millis(200));

        assert!(matches!(ui_rx.recv_timeout(WAIT), Ok(UiEvent::Error(_))));
        match ui_rx.recv_timeout(WAIT).expect("settle event") {
            UiEvent::ItemSettled { page, target, outcome } => {
                assert_eq!(page, PageToken(6));
                assert_eq!(target, ItemTarget::Faq(FaqId(1)));
                assert!(outcome.is_ok());
            }
            _ => panic!("unexpected event"),
        }
    }
}

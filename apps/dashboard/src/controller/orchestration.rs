//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` without blocking the UI thread. Returns false when the command
/// was not queued; `status` then says why and the caller must undo any
/// pending state it set for the command.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> bool {
    let cmd_name = cmd.name();
    let page = cmd.page().0;

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, page, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker is not running; restart the dashboard".to_string();
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::controller::events::PageToken;

    #[test]
    fn reports_full_queue_without_blocking() {
        let (tx, _rx) = bounded::<BackendCommand>(1);
        let mut status = String::new();
        let preview = |model: &str| BackendCommand::FetchPreview {
            page: PageToken(1),
            model: model.to_string(),
        };

        assert!(dispatch_backend_command(&tx, preview("a"), &mut status));
        assert!(status.is_empty());
        assert!(!dispatch_backend_command(&tx, preview("b"), &mut status));
        assert_eq!(status, "UI command queue is full; please retry");
    }

    #[test]
    fn reports_stopped_worker() {
        let (tx, rx) = bounded::<BackendCommand>(4);
        drop(rx);
        let mut status = String::new();

        let queued = dispatch_backend_command(
            &tx,
            BackendCommand::FetchPreview {
                page: PageToken(2),
                model: "m".into(),
            },
            &mut status,
        );

        assert!(!queued);
        assert!(status.contains("not running"));
    }
}

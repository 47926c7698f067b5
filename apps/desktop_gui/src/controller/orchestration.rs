//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::Refresh => "refresh",
        BackendCommand::UpdateField { .. } => "update_field",
        BackendCommand::SetFilter { .. } => "set_filter",
        BackendCommand::BeginEdit { .. } => "begin_edit",
        BackendCommand::CancelEdit { .. } => "cancel_edit",
        BackendCommand::Submit { .. } => "submit",
        BackendCommand::Remove { .. } => "remove",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker disconnected (possible startup failure); restart the app".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn queues_command_without_touching_status() {
        let (tx, rx) = bounded(1);
        let mut status = String::from("ready");

        dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status);

        assert_eq!(rx.try_recv().expect("queued"), BackendCommand::Refresh);
        assert_eq!(status, "ready");
    }

    #[test]
    fn reports_full_queue() {
        let (tx, _rx) = bounded(1);
        let mut status = String::new();

        dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status);
        dispatch_backend_command(&tx, BackendCommand::Refresh, &mut status);

        assert!(status.contains("queue is full"));
    }

    #[test]
    fn reports_disconnected_worker() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let mut status = String::new();

        dispatch_backend_command(&tx, BackendCommand::CancelEdit { seq: 1 }, &mut status);

        assert!(status.contains("disconnected"));
    }
}

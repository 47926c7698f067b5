//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{DocenteEditor, EditorEvent, HttpDocenteDirectory, Mutation, Settings};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::domain::{DocenteId, Draft, DraftField};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        send_ui_event(
            &ui_tx,
            UiEvent::Info("Backend worker starting...".to_string()),
        );
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                send_ui_event(
                    &ui_tx,
                    UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: failed to build runtime: {err}"),
                    )),
                );
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let directory = match HttpDocenteDirectory::from_settings(&settings) {
                Ok(directory) => directory,
                Err(err) => {
                    send_ui_event(
                        &ui_tx,
                        UiEvent::Error(UiError::from_message(
                            UiErrorContext::BackendStartup,
                            format!("backend worker startup failure: {err:#}"),
                        )),
                    );
                    tracing::error!("failed to build directory client: {err:#}");
                    return;
                }
            };
            tracing::info!(base_url = directory.base_url(), "backend worker ready");

            let editor = DocenteEditor::new(Arc::new(directory));
            tokio::spawn(forward_editor_events(editor.subscribe(), ui_tx.clone()));
            let mut worker = EditorWorker::new(editor);

            worker.handle(BackendCommand::Refresh, &ui_tx).await;

            // recv blocks the runtime thread; editor work is serialized through this loop.
            while let Ok(cmd) = cmd_rx.recv() {
                worker.handle(cmd, &ui_tx).await;
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

/// Delivers an event to the UI. Returns `false` when it was dropped.
pub fn send_ui_event(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    let kind = event.kind();
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::warn!(kind, "ui event queue is full; dropping backend event");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!(kind, "ui event queue closed");
            false
        }
    }
}

async fn forward_editor_events(mut events: broadcast::Receiver<EditorEvent>, ui_tx: Sender<UiEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                send_ui_event(&ui_tx, UiEvent::Editor(event));
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "ui lagged behind editor events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Owns the editor on the backend thread and tracks the newest draft revision
/// the UI has sent, so snapshots can tell the UI whether they are current.
pub struct EditorWorker {
    editor: DocenteEditor,
    draft_seq: u64,
}

impl EditorWorker {
    pub fn new(editor: DocenteEditor) -> Self {
        Self {
            editor,
            draft_seq: 0,
        }
    }

    #[cfg(test)]
    pub fn editor(&self) -> &DocenteEditor {
        &self.editor
    }

    /// Applies one UI command to the editor and reports the outcome back to the UI.
    pub async fn handle(&mut self, cmd: BackendCommand, ui_tx: &Sender<UiEvent>) {
        match cmd {
            BackendCommand::UpdateField { field, value, seq } => {
                tracing::debug!(field = field.as_str(), seq, "draft field updated");
                self.draft_seq = seq;
                self.editor.update_field(field, value);
                return;
            }
            BackendCommand::SetFilter { text } => {
                self.editor.set_filter(text);
                return;
            }
            BackendCommand::Refresh => {
                if let Err(err) = self.editor.refresh().await {
                    send_ui_event(
                        ui_tx,
                        UiEvent::Error(UiError::from_editor_error(UiErrorContext::Refresh, &err)),
                    );
                }
            }
            BackendCommand::BeginEdit { docente, seq } => {
                self.draft_seq = seq;
                self.editor.begin_edit(&docente);
            }
            BackendCommand::CancelEdit { seq } => {
                self.draft_seq = seq;
                self.editor.reset_draft();
            }
            BackendCommand::Submit {
                draft,
                editing,
                seq,
            } => {
                self.draft_seq = seq;
                self.sync_form(&draft, editing);
                let event = match self.editor.submit().await {
                    Ok(mutation) => UiEvent::Info(describe_mutation(mutation)),
                    Err(err) => {
                        UiEvent::Error(UiError::from_editor_error(UiErrorContext::Submit, &err))
                    }
                };
                send_ui_event(ui_tx, event);
            }
            BackendCommand::Remove { id } => {
                let event = match self.editor.remove(id).await {
                    Ok(()) => UiEvent::Info(describe_mutation(Mutation::Deleted(id))),
                    Err(err) => {
                        UiEvent::Error(UiError::from_editor_error(UiErrorContext::Delete, &err))
                    }
                };
                send_ui_event(ui_tx, event);
            }
        }
        send_ui_event(
            ui_tx,
            UiEvent::Snapshot {
                snapshot: self.editor.snapshot(),
                draft_seq: self.draft_seq,
            },
        );
    }

    // Brings the editor's target and draft in line with the submitted form.
    fn sync_form(&mut self, draft: &Draft, editing: Option<DocenteId>) {
        if self.editor.editing_target() != editing {
            let target = editing.and_then(|id| {
                self.editor
                    .docentes()
                    .iter()
                    .find(|docente| docente.id == id)
                    .cloned()
            });
            match (editing, target) {
                (Some(_), Some(docente)) => self.editor.begin_edit(&docente),
                (Some(id), None) => {
                    tracing::warn!(%id, "edit target is no longer listed; submitting as new");
                    self.editor.reset_draft();
                }
                (None, _) => self.editor.reset_draft(),
            }
        }
        for field in DraftField::ALL {
            if self.editor.draft().get(field) != draft.get(field) {
                self.editor.update_field(field, draft.get(field));
            }
        }
    }
}

fn describe_mutation(mutation: Mutation) -> String {
    match mutation {
        Mutation::Created => "Docente agregado".to_string(),
        Mutation::Updated(id) => format!("Docente {id} actualizado"),
        Mutation::Deleted(id) => format!("Docente {id} eliminado"),
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
pub(crate) mod tests;

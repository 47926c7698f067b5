use super::*;

use anyhow::anyhow;
use client_core::{DocenteEditor, EditorError, EditorSnapshot};
use crossbeam_channel::bounded;
use shared::validation::{validate, EMAIL_INVALID};

use crate::backend_bridge::runtime::{tests::FakeDirectory, EditorWorker};
use crate::controller::events::UiErrorContext;

fn docente(id: i64, nombre: &str) -> Docente {
    Docente {
        id: DocenteId(id),
        nombre: nombre.to_string(),
        email: format!("{}@uni.edu", nombre.to_lowercase()),
        especialidad: "Historia".to_string(),
    }
}

fn app() -> (DocentesApp, Receiver<BackendCommand>, Sender<UiEvent>) {
    let (cmd_tx, cmd_rx) = bounded(16);
    let (ui_tx, ui_rx) = bounded(16);
    (DocentesApp::new(cmd_tx, ui_rx), cmd_rx, ui_tx)
}

#[test]
fn snapshot_replaces_state_but_keeps_local_filter() {
    let (mut app, _cmd_rx, _ui_tx) = app();
    app.filter = "an".to_string();

    app.apply_event(UiEvent::Snapshot {
        snapshot: EditorSnapshot {
            docentes: vec![docente(1, "Ana"), docente(2, "Beto"), docente(3, "Mariana")],
            draft: docente(2, "Beto").to_draft(),
            editing: Some(DocenteId(2)),
            filter: String::new(),
            status: EditorStatus::Idle,
        },
        draft_seq: 0,
    });

    assert_eq!(app.editing, Some(DocenteId(2)));
    assert_eq!(app.draft.nombre, "Beto");
    assert!(!app.busy());
    let visible: Vec<_> = app.visible_docentes().into_iter().map(|d| d.id.0).collect();
    assert_eq!(visible, vec![1, 3]);
}

#[test]
fn events_queued_by_worker_are_drained() {
    let (mut app, _cmd_rx, ui_tx) = app();
    ui_tx
        .try_send(UiEvent::Info("Docente agregado".to_string()))
        .expect("queue");
    ui_tx
        .try_send(UiEvent::Editor(EditorEvent::StatusChanged(EditorStatus::Idle)))
        .expect("queue");

    app.process_ui_events();

    assert_eq!(app.status_line, "Docente agregado");
    assert_eq!(app.status, EditorStatus::Idle);
}

#[test]
fn validation_error_lands_on_fields_and_submit_clears_it() {
    let (mut app, cmd_rx, _ui_tx) = app();
    let mut draft = docente(1, "Ana").to_draft();
    draft.email = "ana@".to_string();
    let errors = validate(&draft).expect_err("bad email");

    app.apply_event(UiEvent::Error(UiError::from_editor_error(
        UiErrorContext::Submit,
        &EditorError::Validation(errors),
    )));
    assert_eq!(app.field_errors.len(), 1);
    assert_eq!(app.field_errors[0].field, DraftField::Email);
    assert_eq!(app.field_errors[0].message, EMAIL_INVALID);
    assert!(app.last_error.is_none());

    app.draft = draft.clone();
    app.submit();
    assert!(app.field_errors.is_empty());
    assert_eq!(
        cmd_rx.try_recv().expect("submit queued"),
        BackendCommand::Submit {
            draft,
            editing: None,
            seq: 1,
        }
    );
}

#[test]
fn transport_error_is_cleared_by_next_successful_load() {
    let (mut app, _cmd_rx, _ui_tx) = app();

    app.apply_event(UiEvent::Error(UiError::from_editor_error(
        UiErrorContext::Refresh,
        &EditorError::Transport(anyhow!("connection refused")),
    )));
    assert!(app.last_error.is_some());

    app.apply_event(UiEvent::Editor(EditorEvent::CollectionReplaced { count: 0 }));
    assert!(app.last_error.is_none());
}

#[test]
fn stale_list_after_mutation_is_reported() {
    let (mut app, _cmd_rx, _ui_tx) = app();

    app.apply_event(UiEvent::Editor(EditorEvent::TransportFailed {
        operation: Operation::Refresh,
        message: "503 Service Unavailable".to_string(),
    }));

    assert!(app.status_line.contains("desactualizada"));
    assert!(app.status_line.contains("503"));
}

#[test]
fn card_actions_queue_backend_commands() {
    let (mut app, cmd_rx, _ui_tx) = app();

    app.begin_edit(docente(4, "Luz"));
    app.remove(DocenteId(4));
    app.cancel_edit();

    let queued: Vec<_> = cmd_rx.try_iter().collect();
    assert_eq!(
        queued,
        vec![
            BackendCommand::BeginEdit {
                docente: docente(4, "Luz"),
                seq: 1,
            },
            BackendCommand::Remove { id: DocenteId(4) },
            BackendCommand::CancelEdit { seq: 2 },
        ]
    );
}

#[test]
fn begin_edit_fills_form_before_worker_answers() {
    let (mut app, _cmd_rx, _ui_tx) = app();

    app.begin_edit(docente(4, "Luz"));

    assert_eq!(app.editing, Some(DocenteId(4)));
    assert_eq!(app.draft.nombre, "Luz");

    app.cancel_edit();
    assert_eq!(app.editing, None);
    assert!(app.draft.is_empty());
}

#[test]
fn older_snapshot_keeps_local_draft_but_takes_collection() {
    let (mut app, _cmd_rx, _ui_tx) = app();
    app.draft.nombre = "Lu".to_string();
    app.edit_field(DraftField::Nombre, "Lu".to_string());

    app.apply_event(UiEvent::Snapshot {
        snapshot: EditorSnapshot {
            docentes: vec![docente(1, "Ana")],
            status: EditorStatus::Idle,
            ..EditorSnapshot::default()
        },
        draft_seq: 0,
    });

    assert_eq!(app.draft.nombre, "Lu");
    assert_eq!(app.docentes.len(), 1);
    assert!(!app.busy());
}

// Relays queued commands to the worker one at a time.
async fn step(
    worker: &mut EditorWorker,
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
) {
    let cmd = cmd_rx.try_recv().expect("queued command");
    worker.handle(cmd, ui_tx).await;
}

#[tokio::test]
async fn typing_during_refresh_keeps_form_and_worker_in_step() {
    let (mut app, cmd_rx, ui_tx) = app();
    let directory = FakeDirectory::new(vec![docente(1, "Ana")]);
    let mut worker = EditorWorker::new(DocenteEditor::new(directory.clone()));

    app.dispatch(BackendCommand::Refresh);
    for (field, value) in [
        (DraftField::Nombre, "Luz"),
        (DraftField::Email, "luz@uni.edu"),
        (DraftField::Especialidad, "Arte"),
    ] {
        app.draft.set(field, value);
        app.edit_field(field, value.to_string());
    }

    // The refresh answers while the keystrokes are still queued.
    step(&mut worker, &cmd_rx, &ui_tx).await;
    app.process_ui_events();
    assert_eq!(app.draft.nombre, "Luz");
    assert_eq!(app.docentes.len(), 1);

    for _ in 0..3 {
        step(&mut worker, &cmd_rx, &ui_tx).await;
    }
    app.process_ui_events();
    assert_eq!(app.draft, worker.editor().draft().clone());

    app.submit();
    step(&mut worker, &cmd_rx, &ui_tx).await;
    app.process_ui_events();

    let stored = directory.docentes().await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].nombre, "Luz");
    assert!(app.draft.is_empty());
    assert!(worker.editor().draft().is_empty());
    assert_eq!(app.docentes.len(), 2);
}

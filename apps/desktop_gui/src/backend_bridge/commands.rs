//! Backend commands queued from UI to backend worker.

use shared::domain::{Docente, DocenteId, Draft, DraftField};

/// Commands that touch the draft carry `seq`, the UI's draft revision at the
/// time they were sent. Snapshots echo the last revision the worker applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Refresh,
    UpdateField {
        field: DraftField,
        value: String,
        seq: u64,
    },
    SetFilter {
        text: String,
    },
    BeginEdit {
        docente: Docente,
        seq: u64,
    },
    CancelEdit {
        seq: u64,
    },
    /// Submits the form exactly as the UI shows it.
    Submit {
        draft: Draft,
        editing: Option<DocenteId>,
        seq: u64,
    },
    Remove {
        id: DocenteId,
    },
}

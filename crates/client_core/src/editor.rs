//! Form-validation-then-sync state machine for the docente list.
//!
//! [`DocenteEditor`] owns the cached collection, the draft, the optional edit
//! target and the search filter. Every mutating call validates locally, talks
//! to the [`DocenteDirectory`], and on success reloads the whole collection.
//! Views observe it through [`DocenteEditor::subscribe`] or by taking a
//! [`EditorSnapshot`].

use std::sync::Arc;

use shared::{
    domain::{filter_by_nombre, Docente, DocenteId, Draft, DraftField},
    error::ValidationErrors,
    validation::validate,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{DocenteDirectory, EditorError};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorStatus {
    #[default]
    Idle,
    Loading,
    Submitting,
    Deleting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Refresh,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Refresh => "refresh",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// A change the directory accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Created,
    Updated(DocenteId),
    Deleted(DocenteId),
}

#[derive(Debug, Clone)]
pub enum EditorEvent {
    StatusChanged(EditorStatus),
    CollectionReplaced { count: usize },
    DraftCleared,
    Mutated(Mutation),
    ValidationFailed(ValidationErrors),
    TransportFailed { operation: Operation, message: String },
}

/// Owned copy of the editor state for views that live elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub docentes: Vec<Docente>,
    pub draft: Draft,
    pub editing: Option<DocenteId>,
    pub filter: String,
    pub status: EditorStatus,
}

impl EditorSnapshot {
    pub fn visible_docentes(&self) -> Vec<&Docente> {
        filter_by_nombre(&self.docentes, &self.filter)
    }
}

pub struct DocenteEditor {
    directory: Arc<dyn DocenteDirectory>,
    docentes: Vec<Docente>,
    draft: Draft,
    editing: Option<DocenteId>,
    filter: String,
    status: EditorStatus,
    events: broadcast::Sender<EditorEvent>,
}

impl DocenteEditor {
    pub fn new(directory: Arc<dyn DocenteDirectory>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            directory,
            docentes: Vec::new(),
            draft: Draft::default(),
            editing: None,
            filter: String::new(),
            status: EditorStatus::Idle,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.events.subscribe()
    }

    pub fn docentes(&self) -> &[Docente] {
        &self.docentes
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn editing_target(&self) -> Option<DocenteId> {
        self.editing
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn status(&self) -> EditorStatus {
        self.status
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            docentes: self.docentes.clone(),
            draft: self.draft.clone(),
            editing: self.editing,
            filter: self.filter.clone(),
            status: self.status,
        }
    }

    /// Cached docentes whose `nombre` matches the filter, in collection order.
    pub fn visible_docentes(&self) -> Vec<&Docente> {
        filter_by_nombre(&self.docentes, &self.filter)
    }

    pub fn update_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    /// Points the draft at an existing docente. The draft is a copy; later
    /// refreshes of the collection do not touch it.
    pub fn begin_edit(&mut self, docente: &Docente) {
        debug!(id = %docente.id, "editing docente");
        self.editing = Some(docente.id);
        self.draft = docente.to_draft();
    }

    /// Drops the draft and leaves edit mode without contacting the directory.
    pub fn reset_draft(&mut self) {
        self.clear_draft();
    }

    /// Replaces the cached collection with the directory's. On failure the
    /// previous collection is kept.
    pub async fn refresh(&mut self) -> Result<usize, EditorError> {
        self.set_status(EditorStatus::Loading);
        let result = self.directory.list().await;
        self.set_status(EditorStatus::Idle);

        match result {
            Ok(docentes) => {
                let count = docentes.len();
                self.docentes = docentes;
                info!(count, "docente list refreshed");
                self.emit(EditorEvent::CollectionReplaced { count });
                Ok(count)
            }
            Err(err) => Err(self.transport_failure(Operation::Refresh, err)),
        }
    }

    /// Validates the draft and creates or updates it remotely, depending on
    /// whether an edit target is set.
    pub async fn submit(&mut self) -> Result<Mutation, EditorError> {
        let valid = match validate(&self.draft) {
            Ok(valid) => valid,
            Err(errors) => {
                debug!(violations = errors.errors().len(), "draft rejected");
                self.emit(EditorEvent::ValidationFailed(errors.clone()));
                return Err(EditorError::Validation(errors));
            }
        };

        self.set_status(EditorStatus::Submitting);
        let (operation, result) = match self.editing {
            Some(id) => (
                Operation::Update,
                self.directory
                    .update(id, &valid)
                    .await
                    .map(|()| Mutation::Updated(id)),
            ),
            None => (
                Operation::Create,
                self.directory
                    .create(&valid)
                    .await
                    .map(|()| Mutation::Created),
            ),
        };
        self.set_status(EditorStatus::Idle);

        let mutation = match result {
            Ok(mutation) => mutation,
            Err(err) => return Err(self.transport_failure(operation, err)),
        };

        info!(?mutation, "docente saved");
        self.clear_draft();
        self.emit(EditorEvent::Mutated(mutation));
        self.refresh_after_mutation().await;
        Ok(mutation)
    }

    /// Deletes a docente. Removing the one currently being edited also drops
    /// the draft.
    pub async fn remove(&mut self, id: DocenteId) -> Result<(), EditorError> {
        self.set_status(EditorStatus::Deleting);
        let result = self.directory.delete(id).await;
        self.set_status(EditorStatus::Idle);

        if let Err(err) = result {
            return Err(self.transport_failure(Operation::Delete, err));
        }

        info!(%id, "docente deleted");
        if self.editing == Some(id) {
            self.clear_draft();
        }
        let mutation = Mutation::Deleted(id);
        self.emit(EditorEvent::Mutated(mutation));
        self.refresh_after_mutation().await;
        Ok(())
    }

    // The mutation already succeeded; a failed reload only leaves the cache
    // stale and is reported through the event stream.
    async fn refresh_after_mutation(&mut self) {
        if self.refresh().await.is_err() {
            debug!("cached docente list is stale until the next refresh");
        }
    }

    fn clear_draft(&mut self) {
        self.draft = Draft::default();
        self.editing = None;
        self.emit(EditorEvent::DraftCleared);
    }

    fn transport_failure(&self, operation: Operation, err: anyhow::Error) -> EditorError {
        let message = format!("{err:#}");
        warn!(operation = operation.as_str(), error = %message, "directory request failed");
        self.emit(EditorEvent::TransportFailed { operation, message });
        EditorError::Transport(err)
    }

    fn set_status(&mut self, status: EditorStatus) {
        if self.status != status {
            self.status = status;
            self.emit(EditorEvent::StatusChanged(status));
        }
    }

    fn emit(&self, event: EditorEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;

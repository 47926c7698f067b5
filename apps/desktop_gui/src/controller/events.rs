//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{EditorError, EditorEvent, EditorSnapshot};
use shared::error::FieldError;

pub enum UiEvent {
    Info(String),
    Snapshot {
        snapshot: EditorSnapshot,
        draft_seq: u64,
    },
    Editor(EditorEvent),
    Error(UiError),
}

impl UiEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            UiEvent::Info(_) => "info",
            UiEvent::Snapshot { .. } => "snapshot",
            UiEvent::Editor(_) => "editor",
            UiEvent::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Refresh,
    Submit,
    Delete,
}

impl UiErrorContext {
    fn action(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "Starting the backend worker",
            UiErrorContext::Refresh => "Loading docentes",
            UiErrorContext::Submit => "Saving the docente",
            UiErrorContext::Delete => "Deleting the docente",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
    field_errors: Vec<FieldError>,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Unknown,
            context,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    pub fn from_editor_error(context: UiErrorContext, err: &EditorError) -> Self {
        match err {
            EditorError::Validation(errors) => Self {
                category: UiErrorCategory::Validation,
                context,
                message: errors.to_string(),
                field_errors: errors.errors().to_vec(),
            },
            EditorError::Transport(source) => Self {
                category: UiErrorCategory::Transport,
                context,
                message: format!(
                    "{} failed; check the server and retry: {source:#}",
                    context.action()
                ),
                field_errors: Vec::new(),
            },
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }
}

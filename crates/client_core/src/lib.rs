use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Docente, DocenteId},
    error::ValidationErrors,
    protocol::{docente_url, docentes_url},
    validation::ValidDraft,
};
use thiserror::Error;
use tracing::debug;

pub mod config;
pub mod editor;

pub use config::Settings;
pub use editor::{DocenteEditor, EditorEvent, EditorSnapshot, EditorStatus, Mutation, Operation};

/// Failure of an editor operation. Validation failures never reach the network;
/// transport failures leave local state untouched.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("directory request failed: {0:#}")]
    Transport(#[source] anyhow::Error),
}

impl EditorError {
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            EditorError::Validation(errors) => Some(errors),
            EditorError::Transport(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, EditorError::Transport(_))
    }
}

/// Remote collection of docentes.
#[async_trait]
pub trait DocenteDirectory: Send + Sync {
    async fn list(&self) -> Result<Vec<Docente>>;
    async fn create(&self, draft: &ValidDraft) -> Result<()>;
    async fn update(&self, id: DocenteId, draft: &ValidDraft) -> Result<()>;
    async fn delete(&self, id: DocenteId) -> Result<()>;
}

/// Directory backed by the REST API under `{base_url}/api/docentes`.
pub struct HttpDocenteDirectory {
    http: Client,
    base_url: String,
}

impl HttpDocenteDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(http, settings.api_base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DocenteDirectory for HttpDocenteDirectory {
    async fn list(&self) -> Result<Vec<Docente>> {
        let url = docentes_url(&self.base_url);
        let docentes: Vec<Docente> = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?
            .json()
            .await
            .context("failed to decode docente list")?;
        debug!(count = docentes.len(), "listed docentes");
        Ok(docentes)
    }

    async fn create(&self, draft: &ValidDraft) -> Result<()> {
        let url = docentes_url(&self.base_url);
        self.http
            .post(&url)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, id: DocenteId, draft: &ValidDraft) -> Result<()> {
        let url = docente_url(&self.base_url, id);
        self.http
            .put(&url)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("PUT {url}"))?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, id: DocenteId) -> Result<()> {
        let url = docente_url(&self.base_url, id);
        self.http
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("DELETE {url}"))?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

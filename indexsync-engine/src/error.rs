//! Error types for the reconciliation engine.

use crate::orchestrator::ReconcileStage;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error reported by an [`IndexClient`](crate::IndexClient) call.
#[derive(Debug, Error)]
#[error("{operation} failed: {message}")]
pub struct ClientError {
    /// Remote operation that failed (e.g. `put_settings`).
    pub operation: String,
    /// HTTP-style status code, when the transport reports one.
    pub status: Option<u16>,
    pub message: String,
}

impl ClientError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Errors that can occur while planning or applying a reconciliation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid input detected by a reconciler.
    #[error("diff error: {0}")]
    Diff(#[from] indexsync_diff::DiffError),

    /// Invalid configuration document.
    #[error("model error: {0}")]
    Model(#[from] indexsync_model::ModelError),

    /// A remote call failed. Later stages were not attempted.
    #[error("{stage:?} stage failed: {source}")]
    Client {
        stage: ReconcileStage,
        #[source]
        source: ClientError,
    },

    /// The engine configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

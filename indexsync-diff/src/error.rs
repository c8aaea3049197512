//! Error types for the reconcilers.

use thiserror::Error;

/// Result type for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;

/// Precondition violations detected while diffing.
#[derive(Debug, Error)]
pub enum DiffError {
    /// A setting key is in neither the static nor the dynamic registry.
    #[error("unknown setting key: {0}")]
    UnknownSettingKey(String),

    /// Model decoding error.
    #[error(transparent)]
    Model(#[from] indexsync_model::ModelError),
}

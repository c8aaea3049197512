//! Error types for the configuration model.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while decoding index configuration.
///
/// All of these are precondition violations: the caller handed over a
/// document that does not describe a well-formed index.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A mapping node is neither a leaf (`type`) nor an object (`properties`).
    #[error("malformed field at {path}: {reason}")]
    MalformedField { path: String, reason: String },

    /// A setting value has an unsupported shape.
    #[error("invalid setting [{key}]: {reason}")]
    InvalidSetting { key: String, reason: String },

    /// An alias definition could not be decoded.
    #[error("invalid alias [{name}]: {reason}")]
    InvalidAlias { name: String, reason: String },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

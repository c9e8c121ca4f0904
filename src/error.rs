//! Error types for idspoll
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using IdsError
pub type Result<T> = std::result::Result<T, IdsError>;

/// Unified error type for idspoll operations
#[derive(Debug, Error)]
pub enum IdsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    /// Serialized request does not fit the fixed I/O buffer. Raised before any I/O.
    #[error("Encoded request is {size} bytes, buffer holds {capacity}")]
    EncodingTooLarge { size: usize, capacity: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("Transport failure: {0}")]
    Transport(String),

    // -------------------------------------------------------------------------
    // Reply Errors
    // -------------------------------------------------------------------------
    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    #[error("Result does not match {shape}: {reason}")]
    ResultShapeMismatch { shape: &'static str, reason: String },

    #[error("Reply carries no result field")]
    NoResultField,

    // -------------------------------------------------------------------------
    // Control Surface Errors
    // -------------------------------------------------------------------------
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Parameter is read-only: {0}")]
    ReadOnlyParameter(String),

    // -------------------------------------------------------------------------
    // Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Poll worker failed: {0}")]
    Worker(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IdsError {
    /// True for failures that only cost the current poll cycle its value
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IdsError::Io(_)
                | IdsError::Transport(_)
                | IdsError::MalformedReply(_)
                | IdsError::ResultShapeMismatch { .. }
                | IdsError::NoResultField
        )
    }
}

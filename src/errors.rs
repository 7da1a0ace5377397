// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for topology operations

use thiserror::Error;

use crate::state_machine::TransitionError;

/// Errors that can occur while building, diffing or applying a topology
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A parameters string or declaration line could not be parsed
    #[error("Malformed value: {0}")]
    MalformedValue(String),

    /// Edge lookup or removal on an edge that is not in the map
    #[error("Edge not found: {backend} -> {frontend}")]
    NotFound { backend: String, frontend: String },

    /// The external attach/detach tool reported a failure
    #[error("{operation} failed for {target}: {reason}")]
    ExternalOperationFailed {
        operation: String,
        target: String,
        reason: String,
    },

    /// Reading or writing the durable store failed
    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    /// The domain directory could not be queried
    #[error("Domain directory error: {0}")]
    Directory(String),

    /// A reconciliation pass was driven out of order
    #[error("Pass phase error: {0}")]
    Transition(#[from] TransitionError),
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

impl TopologyError {
    /// Shorthand for a [`TopologyError::NotFound`] on an edge
    pub fn not_found(backend: impl Into<String>, frontend: impl Into<String>) -> Self {
        TopologyError::NotFound {
            backend: backend.into(),
            frontend: frontend.into(),
        }
    }

    /// Shorthand for a [`TopologyError::ExternalOperationFailed`]
    pub fn external(
        operation: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        TopologyError::ExternalOperationFailed {
            operation: operation.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// True for errors that come from an attach/detach tool invocation
    pub fn is_external(&self) -> bool {
        matches!(self, TopologyError::ExternalOperationFailed { .. })
    }
}

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        TopologyError::PersistenceFailed(err.to_string())
    }
}

impl From<std::io::Error> for TopologyError {
    fn from(err: std::io::Error) -> Self {
        TopologyError::PersistenceFailed(err.to_string())
    }
}

//! Error types for the mutation probe.
//!
//! Two layers:
//! - [`CollectionError`] is what a container returns from a mutating call.
//!   `Unsupported` is the canonical "this operation is disabled" signal.
//! - [`ProbeError`] is what callers of the probe see.

use crate::Capability;
use thiserror::Error;

/// Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Failure signalled by a container operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The implementation does not permit this operation (read-only, immutable).
    #[error("operation not supported")]
    Unsupported,

    /// An index argument was outside the container bounds.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A cursor operation was called in a position that does not allow it.
    #[error("illegal cursor state: {0}")]
    IllegalState(String),

    /// A lock guarding the container was poisoned by a panicking writer.
    #[error("container lock poisoned")]
    Poisoned,

    /// Any other implementation-specific failure.
    #[error("{0}")]
    Other(String),
}

impl CollectionError {
    /// Returns whether this is the canonical unsupported signal.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CollectionError::Unsupported)
    }
}

/// Errors surfaced to callers of [`crate::MutationProbe`].
#[derive(Error, Debug)]
pub enum ProbeError {
    /// A required argument was absent.
    #[error("{parameter} should not be null")]
    InvalidArgument { parameter: &'static str },

    /// An attempted operation failed with something other than the
    /// unsupported signal. The container does not honor the operation's
    /// contract, so the result set would be unreliable.
    #[error("{capability} operation `{operation}` failed: {source}")]
    Execution {
        capability: Capability,
        operation: &'static str,
        #[source]
        source: CollectionError,
    },

    /// Failed to load, parse or validate a probe policy.
    #[error("policy error: {0}")]
    Policy(String),

    /// I/O error during policy file operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Absent-argument error for the probed container.
    pub fn null_target() -> Self {
        ProbeError::InvalidArgument { parameter: "target" }
    }

    /// Name of the operation that failed, for execution errors.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            ProbeError::Execution { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

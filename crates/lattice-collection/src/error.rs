//! Error types for the collection adapter.
//!
//! The adapter itself performs no fallible I/O. Errors come from the host
//! widget (construction or layout application failing), from driving the
//! component lifecycle out of order, and from parsing layout presets.

use thiserror::Error;

/// A failure reported by the host widget implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("host widget failed to {operation}: {message}")]
pub struct HostError {
    /// The widget operation that failed, e.g. `"apply layout"`.
    pub operation: &'static str,
    /// The host's description of the failure.
    pub message: String,
}

impl HostError {
    /// Creates a host error for the given operation.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Errors that can occur while mounting or updating a collection component.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// The component has not been mounted yet, or was unmounted.
    #[error("component is not mounted")]
    NotMounted,

    /// The host widget reported a failure.
    #[error(transparent)]
    Host(#[from] HostError),

    /// A layout preset could not be parsed.
    #[error("invalid layout configuration: {0}")]
    Config(String),
}

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;

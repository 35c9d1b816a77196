//! Error types for lattice-collection-core.

use thiserror::Error;

/// Signal-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// The connection ID is invalid or has already been disconnected.
    #[error("invalid or disconnected connection ID")]
    InvalidConnection,
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, SignalError>;

//! Error types for the state engine.

use ledger_core::ValidationError;
use ledger_storage::StorageError;
use thiserror::Error;

/// State engine errors.
#[derive(Error, Debug)]
pub enum StateError {
    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation failure for the submitted input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A row required by a committed invariant is missing.
    #[error("Data corruption detected: {0}")]
    Corruption(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for state operations.
pub type StateResult<T> = Result<T, StateError>;

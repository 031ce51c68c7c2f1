/*
    errors.rs - Error types for the store subsystem

    Taxonomy:
    - NotFound: a referenced user/conversation/membership does not
      exist. Reportable on the send and listing paths; presence,
      typing, and read-mark updates swallow it and return Ok instead
      (best-effort signals never surface user-visible errors).
    - Validation: rejected before any mutation, nothing partially
      applied.
    - Conflict: concurrent multi-row mutation lost a race. The
      conversation-creation path resolves races internally and returns
      the winner's id, so callers normally never see this.
    - Storage: the underlying state is unavailable (today: a poisoned
      lock). Retryable.
*/

use std::sync::PoisonError;
use thiserror::Error;

/// Errors that can occur in the store subsystem
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Concurrent modification conflict
    #[error("Concurrent modification: {0}")]
    Conflict(String),

    /// Storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Helper to convert poison errors into StoreError
pub(crate) fn handle_poison<T>(_err: PoisonError<T>) -> StoreError {
    StoreError::Storage("Lock poisoned: a thread panicked while holding the lock".to_string())
}

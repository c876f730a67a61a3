use super::{ProgressError, StorageError};

/// Top-level error type for the Pulse system.
/// All subsystem errors convert into this via `From` impls.
///
/// Two things the caller might expect here are deliberately absent:
/// "already completed today" is a successful idempotent outcome
/// (`CompletionOutcome { created: false, .. }`), and an unresolvable
/// purchase/assignment reference is skipped at the resolver, never
/// surfaced as an error.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("user not found: {id}")]
    UserNotFound { id: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("progress error: {0}")]
    ProgressError(#[from] ProgressError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Convenience type alias.
pub type PulseResult<T> = Result<T, PulseError>;

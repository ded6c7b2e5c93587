//! Error types for the reconciliation engine.
//!
//! Pure engine functions never fail for well-typed input. These errors cover
//! caller-visible conditions: a suggestion that cannot be applied and a
//! persistence call that failed after the local step committed.

use thiserror::Error;

/// Errors surfaced by a reconciliation session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The suggestion carries no replacement or addition text.
    #[error("suggestion {id} has no suggested text")]
    Validation { id: String },

    /// Persisting the document failed. Local state was kept.
    #[error("failed to sync document {document_id}: {message}")]
    Sync {
        document_id: String,
        message: String,
    },
}

/// Result type for session operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

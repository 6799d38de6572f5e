//! Typed error types for the remark-core service layer.

use thiserror::Error;

use crate::model::CommentId;

/// Result type alias for core service operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the remark-core service layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The comment database has not been created yet.
    #[error("No comment database at {path}. Run 'remark init' first.")]
    NotInitialized { path: String },

    /// The comment already has a persisted identity.
    #[error("Comment {id} is already saved and cannot be added again")]
    AlreadyExists { id: CommentId },

    /// The comment has no owning thread.
    #[error("The comment must belong to a thread")]
    MissingThread,

    /// The owning thread does not exist in the store.
    #[error("Thread not found: {identifier}")]
    ThreadNotFound { identifier: String },

    /// An operation was requested against an object in the wrong state.
    #[error("Invalid state: {reason}")]
    InvalidState { reason: String },

    /// A comment references an ancestor that is not part of its thread.
    #[error("Comment {comment_id} references missing ancestor {ancestor}")]
    Corrupted {
        comment_id: CommentId,
        ancestor: CommentId,
    },

    /// An error raised by the underlying store.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

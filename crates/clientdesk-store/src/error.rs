//! Error types for the store crate.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced record does not exist (or vanished mid-transaction).
    #[error("record not found")]
    NotFound,

    /// The email collides with an existing record's unique email.
    #[error("email '{email}' is already taken")]
    DuplicateEmail { email: String },

    /// Backend failure from a non-database implementation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

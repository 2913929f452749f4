//! Storage error types.
//!
//! Used by repository implementations and callers of storage APIs.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
}

impl StorageError {
    /// Maps a unique-constraint violation to `AlreadyExists(id)`, passing anything else through.
    pub(crate) fn on_insert(err: sqlx::Error, id: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StorageError::AlreadyExists(id.to_string())
            }
            _ => StorageError::Database(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

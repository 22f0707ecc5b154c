use crate::id::PermalinkId;
use thiserror::Error;

/// Errors related to parsing and validating core domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid permalink id: {0}")]
    InvalidPermalinkId(String),
}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("permalink already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Errors returned by a [`PermalinkStore`](crate::PermalinkStore).
#[derive(Debug, Clone, Error)]
pub enum PermalinkError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("permalink not found: {0}")]
    NotFound(PermalinkId),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

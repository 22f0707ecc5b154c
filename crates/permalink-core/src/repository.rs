use crate::error::StorageError;
use crate::id::PermalinkId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored permalink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermalinkEntry {
    /// The storage-assigned identifier.
    pub id: PermalinkId,
    /// The full target URL, byte-for-byte as it was submitted.
    pub url: String,
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the entry with the given id.
    /// Returns `None` if no such entry exists.
    async fn get(&self, id: PermalinkId) -> Result<Option<PermalinkEntry>>;

    /// Finds the id of the entry whose url equals `url` exactly.
    async fn find_by_url(&self, url: &str) -> Result<Option<PermalinkId>>;
}

/// Write access to the permalink table.
///
/// Entries are permanent: there is no update or delete.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts `url` and returns the id the storage assigned to it.
    ///
    /// Returns `Err(StorageError::Conflict)` if an entry for `url` already
    /// exists. A failed insert leaves nothing behind.
    async fn insert(&self, url: &str) -> Result<PermalinkId>;
}

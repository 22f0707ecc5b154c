use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use permalink_core::error::StorageError;
use permalink_core::repository::{PermalinkEntry, ReadRepository, Repository, Result};
use permalink_core::PermalinkId;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory implementation of the repository traits using DashMap.
///
/// Two indexes are kept: url to id (the uniqueness constraint) and id to
/// url. Ids come from an atomic sequence starting at 1, mirroring an
/// auto-increment column.
#[derive(Debug)]
pub struct InMemoryRepository {
    by_url: DashMap<String, PermalinkId>,
    by_id: DashMap<PermalinkId, String>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_url: DashMap::with_capacity(capacity),
            by_id: DashMap::with_capacity(capacity),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, id: PermalinkId) -> Result<Option<PermalinkEntry>> {
        Ok(self.by_id.get(&id).map(|url| PermalinkEntry {
            id,
            url: url.value().clone(),
        }))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<PermalinkId>> {
        Ok(self.by_url.get(url).map(|id| *id.value()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, url: &str) -> Result<PermalinkId> {
        // The shard lock on `by_url` is held until the vacant entry is filled,
        // so two racing inserts for the same url cannot both succeed.
        match self.by_url.entry(url.to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(url.to_owned())),
            Entry::Vacant(vacant) => {
                let id = PermalinkId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
                self.by_id.insert(id, url.to_owned());
                vacant.insert(id);
                Ok(id)
            }
        }
    }
}

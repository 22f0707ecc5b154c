//! Storage backends for the `permalinks` table.
//!
//! All backends enforce uniqueness of the stored url at the storage layer,
//! so an insert for a url that is already present fails with
//! [`StorageError::Conflict`] instead of creating a duplicate.

pub mod error;
pub mod memory;
pub mod mysql;
pub mod sqlite;

pub use error::StorageError;
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
pub use permalink_core::repository::{PermalinkEntry, ReadRepository, Repository, Result};
pub use sqlite::SqliteRepository;

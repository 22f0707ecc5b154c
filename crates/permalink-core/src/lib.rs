//! Core types and traits for the permalink service.
//!
//! This crate provides the domain types shared by the storage backends,
//! the permalink service and the HTTP gateway.

pub mod error;
pub mod id;
pub mod repository;
pub mod store;

pub use error::{CoreError, PermalinkError, StorageError};
pub use id::PermalinkId;
pub use repository::{PermalinkEntry, ReadRepository, Repository};
pub use store::PermalinkStore;

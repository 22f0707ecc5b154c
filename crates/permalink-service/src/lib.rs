//! Permalink service implementation.
//!
//! [`PermalinkService`] implements [`PermalinkStore`](permalink_core::PermalinkStore)
//! on top of any [`Repository`](permalink_core::Repository). Core types are
//! re-exported from `permalink_core`.

pub mod service;

pub use permalink_core::{PermalinkError, PermalinkId, PermalinkStore};
pub use service::{PermalinkService, MAX_URL_LENGTH};

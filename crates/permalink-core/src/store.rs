use crate::error::PermalinkError;
use crate::id::PermalinkId;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, PermalinkError>;

#[async_trait]
pub trait PermalinkStore: Send + Sync + 'static {
    /// Returns the id of the permalink for `url`, creating it on first use.
    ///
    /// Repeated calls with the same exact url return the same id.
    async fn get_or_create(&self, url: &str) -> Result<PermalinkId>;

    /// Resolves an id to the url it redirects to.
    /// Returns `Err(PermalinkError::NotFound)` for unknown ids.
    async fn resolve(&self, id: PermalinkId) -> Result<String>;
}

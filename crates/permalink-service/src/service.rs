use async_trait::async_trait;
use permalink_core::{PermalinkError, PermalinkId, PermalinkStore, Repository, StorageError};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use url::Url;

/// Longest url accepted for a permalink, in bytes.
///
/// Matches the width of the `permalink` column in the MySQL schema.
pub const MAX_URL_LENGTH: usize = 2048;

/// A concrete implementation of the [`PermalinkStore`] trait.
///
/// Creation looks the url up first and inserts only on a miss. If the
/// insert loses a race against another request for the same url, the
/// storage layer reports a conflict and the winner's id is looked up and
/// returned.
#[derive(Debug)]
pub struct PermalinkService<R> {
    repository: Arc<R>,
}

impl<R> Clone for PermalinkService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: Repository> PermalinkService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    /// Creates a service over a repository that is shared with other owners.
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Validates that the url is an absolute http(s) url of acceptable size.
    /// `Url::parse` already rejects http(s) urls without a host.
    ///
    /// The input is only inspected, never normalized: the stored permalink is
    /// the exact string the caller sent. `Url::parse` silently drops
    /// surrounding whitespace, tabs and newlines, so those are rejected up
    /// front; a stored url must be usable verbatim as a `Location` header.
    fn validate_url(url: &str) -> Result<(), PermalinkError> {
        if url.is_empty() {
            return Err(PermalinkError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(PermalinkError::InvalidUrl(format!(
                "URL is {} bytes long, the limit is {}",
                url.len(),
                MAX_URL_LENGTH
            )));
        }

        if url.trim() != url {
            return Err(PermalinkError::InvalidUrl(format!(
                "URL has leading or trailing whitespace: {url:?}"
            )));
        }

        if url.chars().any(char::is_control) {
            return Err(PermalinkError::InvalidUrl(format!(
                "URL contains control characters: {url:?}"
            )));
        }

        let parsed = Url::parse(url)
            .map_err(|e| PermalinkError::InvalidUrl(format!("{e}: {url}")))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PermalinkError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                parsed.scheme()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl<R: Repository> PermalinkStore for PermalinkService<R> {
    async fn get_or_create(&self, url: &str) -> Result<PermalinkId, PermalinkError> {
        Self::validate_url(url)?;

        if let Some(id) = self.repository.find_by_url(url).await? {
            debug!(%id, url, "reusing existing permalink");
            return Ok(id);
        }

        match self.repository.insert(url).await {
            Ok(id) => {
                info!(%id, url, "created permalink");
                Ok(id)
            }
            Err(StorageError::Conflict(_)) => {
                debug!(url, "lost insert race, looking up the winning permalink");
                self.repository.find_by_url(url).await?.ok_or_else(|| {
                    warn!(url, "insert conflicted but no permalink row was found");
                    PermalinkError::Storage(StorageError::InvalidData(format!(
                        "conflicting permalink disappeared: {url}"
                    )))
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn resolve(&self, id: PermalinkId) -> Result<String, PermalinkError> {
        trace!(%id, "resolving permalink");

        match self.repository.get(id).await? {
            Some(entry) => {
                debug!(%id, url = %entry.url, "resolved permalink");
                Ok(entry.url)
            }
            None => {
                debug!(%id, "permalink not found");
                Err(PermalinkError::NotFound(id))
            }
        }
    }
}

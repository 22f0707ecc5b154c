use std::sync::Arc;

use permalink_core::{PermalinkId, PermalinkStore};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn PermalinkStore>,
    base_url: String,
}

impl AppState {
    /// `public_base_url` is the address clients use to reach the reporter,
    /// e.g. `http://www.open-mpi.org/mtt/reporter.php`. Both permalink
    /// targets and permalinks themselves are built on it.
    pub fn new(store: Arc<dyn PermalinkStore>, public_base_url: impl Into<String>) -> Self {
        let base_url = public_base_url.into();
        Self {
            store,
            base_url: base_url.trim_end_matches(['?', '&']).to_string(),
        }
    }

    pub fn store(&self) -> &dyn PermalinkStore {
        self.store.as_ref()
    }

    /// The url a permalink for `query` redirects to.
    pub fn target_url(&self, query: &str) -> String {
        format!("{}{}{}", self.base_url, self.separator(), query)
    }

    /// The short url that redirects through `id`.
    pub fn permalink_url(&self, id: PermalinkId) -> String {
        format!("{}{}do_redir={}", self.base_url, self.separator(), id)
    }

    fn separator(&self) -> char {
        if self.base_url.contains('?') {
            '&'
        } else {
            '?'
        }
    }
}

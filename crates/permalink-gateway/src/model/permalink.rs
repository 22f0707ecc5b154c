use permalink_core::PermalinkId;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreatePermalinkRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct PermalinkResponse {
    pub id: PermalinkId,
    /// The url the permalink redirects to.
    pub url: String,
    /// The short url to hand out.
    pub permalink: String,
}

#[derive(Serialize)]
pub struct ResolvedPermalinkResponse {
    pub id: PermalinkId,
    pub url: String,
}

mod permalink;

pub use permalink::{CreatePermalinkRequest, PermalinkResponse, ResolvedPermalinkResponse};

use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

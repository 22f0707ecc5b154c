use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use permalink_core::{CoreError, PermalinkError};
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Permalink(PermalinkError),
}

impl From<PermalinkError> for AppError {
    fn from(value: PermalinkError) -> Self {
        AppError::Permalink(value)
    }
}

impl From<CoreError> for AppError {
    fn from(value: CoreError) -> Self {
        AppError::BadRequest(value.to_string())
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Permalink(PermalinkError::InvalidUrl(_)) => StatusCode::BAD_REQUEST,
            AppError::Permalink(PermalinkError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Permalink(PermalinkError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(message) => message,
            AppError::Permalink(PermalinkError::Storage(source)) => {
                error!(error = %source, "permalink storage failure");
                "internal storage error".to_string()
            }
            AppError::Permalink(other) => other.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

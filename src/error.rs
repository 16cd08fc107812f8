//! Request-level error taxonomy.
//!
//! Every failure in the review and summarization pipelines ends up as an
//! [`AppError`], which the HTTP layer renders as `{"error": message}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed request input.
    #[error("{0}")]
    InvalidInput(String),

    /// The provider returned no data at all.
    #[error("{0}")]
    NotFound(String),

    /// Some data exists but not enough to analyze.
    #[error("Not enough reviews to perform analysis ({found} found, {required} required)")]
    InsufficientData { found: usize, required: usize },

    /// Article text could not be extracted from a URL.
    #[error("Failed to extract article text: {0}")]
    Extraction(String),

    /// Input text was empty or whitespace-only.
    #[error("No text provided to summarize")]
    EmptyInput,

    /// The summarizer failed on a chunk.
    #[error("Summarization failed: {0}")]
    Summarization(String),

    /// The request took longer than the server allows.
    #[error("Request timed out")]
    Timeout,

    /// The review provider or the classifier failed.
    #[error("Upstream request failed: {0}")]
    Upstream(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::InsufficientData { .. }
            | AppError::Extraction(_)
            | AppError::EmptyInput => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Summarization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Rejecting request: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

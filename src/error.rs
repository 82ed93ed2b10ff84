//! Common error type and result alias.
//!
//! Provider failures are collapsed into a `Degraded` outcome by the studio
//! layer and never reach `IntoResponse`; what does reach it (bad input, store
//! faults) is rendered as `{ "error": "..." }`.
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("image provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("image provider returned no inline image")]
    NoImage,

    #[error("image provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("circuit open after {0} consecutive failures")]
    CircuitOpen(u32),

    #[error("image provider API key is not configured")]
    MissingApiKey,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("prompt construction error: {0}")]
    PromptConstruction(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::PromptConstruction(_) => StatusCode::BAD_REQUEST,
            AppError::HttpClient(_)
            | AppError::Provider { .. }
            | AppError::NoImage
            | AppError::Timeout(_)
            | AppError::CircuitOpen(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::warn!("request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

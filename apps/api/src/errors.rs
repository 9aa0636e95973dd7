use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid section: {0}")]
    InvalidSection(String),

    #[error("A selection is required for section '{0}'")]
    SelectionRequired(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Request already in progress")]
    DuplicateRequest,

    #[error("Upstream error: {0}")]
    Upstream(#[from] LlmError),

    #[error("Unparseable response: {0}")]
    UnparseableResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether a user-triggered "try again" can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Upstream(_) | AppError::UnparseableResponse(_) | AppError::DuplicateRequest
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidSection(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_SECTION",
                format!("Unknown section '{msg}'"),
            ),
            AppError::SelectionRequired(_) => (
                StatusCode::CONFLICT,
                "SELECTION_REQUIRED",
                "Please select an option before proceeding.".to_string(),
            ),
            AppError::InvalidState(msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg.clone()),
            AppError::DuplicateRequest => {
                tracing::info!("Rejected duplicate in-flight generation request");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "DUPLICATE_REQUEST",
                    "Request already in progress".to_string(),
                )
            }
            AppError::Upstream(e) => {
                tracing::error!("Generation service error: {e}");
                let code = match e {
                    LlmError::Unavailable(_) => "UPSTREAM_UNAVAILABLE",
                    LlmError::EmptyResponse => "UPSTREAM_EMPTY_RESPONSE",
                    LlmError::RateLimited => "UPSTREAM_RATE_LIMITED",
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    "Failed to generate content. Please try again.".to_string(),
                )
            }
            AppError::UnparseableResponse(msg) => {
                tracing::warn!(kind = "grammar_drift", "Unparseable generation output: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UNPARSEABLE_RESPONSE",
                    "Failed to generate content. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "retryable": self.is_retryable(),
            }
        }));

        (status, body).into_response()
    }
}

//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It
//! implements `axum::response::IntoResponse` to produce structured JSON
//! error responses with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A draft or change-set failed validation (422).
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Resource conflict, e.g. an edit built against a stale snapshot (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: msg.clone(),
                },
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message: msg.clone(),
                },
            ),
            ApiError::ValidationFailed(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorDetail {
                    code: "VALIDATION_FAILED".to_string(),
                    message: msg.clone(),
                },
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ApiErrorDetail {
                    code: "CONFLICT".to_string(),
                    message: msg.clone(),
                },
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                },
            ),
        };

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<liftlog_core::CoreError> for ApiError {
    fn from(err: liftlog_core::CoreError) -> Self {
        match &err {
            // A draft referencing ids the stored tree no longer has was
            // built against a stale snapshot.
            liftlog_core::CoreError::UnknownExerciseId { .. } => {
                ApiError::Conflict(err.to_string())
            }
            _ => ApiError::ValidationFailed(err.to_string()),
        }
    }
}

impl From<liftlog_storage::StorageError> for ApiError {
    fn from(err: liftlog_storage::StorageError) -> Self {
        match &err {
            liftlog_storage::StorageError::UserNotFound(_)
            | liftlog_storage::StorageError::ProgramNotFound(_)
            | liftlog_storage::StorageError::SessionNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            liftlog_storage::StorageError::IntegrityError { .. } => {
                ApiError::Conflict(err.to_string())
            }
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}

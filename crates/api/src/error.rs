//! Application-level error type for HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use keepsake_core::error::CoreError;
use serde_json::json;

/// Wraps [`CoreError`] for domain errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce the uniform
/// `{"error":{"code","message"}}` envelope; backend error text never
/// reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `keepsake-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A document-store error from the MongoDB driver.
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A bad request with a human-readable message naming the rule.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing entity, with the message shown to the caller.
    #[error("{0}")]
    NotFound(String),

    /// A malformed path identifier.
    #[error("Invalid {0} id")]
    InvalidId(&'static str),

    /// Conflicting state (e.g. several stored variants of one image).
    #[error("{0}")]
    Conflict(String),

    /// A dependency (object store, media backend) that cannot be
    /// reached right now.
    #[error("{0}")]
    Unavailable(String),

    /// An internal error with a human-readable message (logged, not
    /// surfaced).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::Validation(rule) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", rule.clone())
                }
                CoreError::InvalidCursor => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_CURSOR",
                    "Invalid cursor format".to_string(),
                ),
                CoreError::CursorOrderMismatch => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_CURSOR",
                    "Cursor order does not match request order".to_string(),
                ),
                CoreError::NotFound { entity } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found"),
                ),
            },

            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }

            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message.clone())
            }
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone())
            }
            AppError::InvalidId(what) => (
                StatusCode::BAD_REQUEST,
                "INVALID_ID",
                format!("Invalid {what} id"),
            ),
            AppError::Conflict(message) => {
                (StatusCode::CONFLICT, "CONFLICT", message.clone())
            }
            AppError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                message.clone(),
            ),
            AppError::Internal(message) => {
                tracing::error!(error = %message, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

//! Application error type mapping to HTTP status codes.
//!
//! Every error body is `{"error": "<message>"}`, the shape the browser client reads.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use gemchat_types::error::{NamingError, RepositoryError, UploadError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request data.
    Validation(String),
    /// Rejected image upload.
    Upload(UploadError),
    /// Chat history storage failure.
    Repository(RepositoryError),
    /// Session allocation failure.
    Naming(NamingError),
    /// Generic internal error.
    Internal(String),
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::Upload(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl From<NamingError> for AppError {
    fn from(e: NamingError) -> Self {
        AppError::Naming(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upload(e @ UploadError::Io(_)) => {
                tracing::error!(error = %e, "Failed to store upload");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Upload(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Repository(e) => {
                tracing::error!(error = %e, "Chat history storage failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Naming(e) => {
                tracing::error!(error = %e, "Chat session allocation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

//! HTTP request handlers.

pub mod chat;
pub mod index;
pub mod upload;

use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::http::error::AppError;

/// Unwrap a JSON body, treating a request with no JSON body as an empty object.
///
/// Malformed JSON is still a 400.
pub(crate) fn body_or_default<T: Default>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    }
}

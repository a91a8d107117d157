//! POST /upload_image -- multipart image upload.

use axum::Json;
use axum::extract::{Multipart, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use gemchat_core::upload::validate_upload;
use gemchat_types::error::UploadError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Largest accepted request body for uploads.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub image_url: String,
}

/// Store the `image` field and return its public URL.
///
/// The file name is checked before the body is read; a rejected upload writes nothing.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart field: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        validate_upload(file_name.as_deref())?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        debug!(file = ?file_name, bytes = bytes.len(), "Received upload");

        let image_url = state.uploads.save(file_name.as_deref(), &bytes).await?;
        return Ok(Json(UploadResponse { image_url }));
    }

    Err(UploadError::MissingFile.into())
}

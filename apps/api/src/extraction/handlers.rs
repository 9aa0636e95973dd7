use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{extract_resume_text, validate_upload};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub text: String,
}

/// POST /upload-resume
///
/// Multipart upload with the PDF in the `resume` field.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;

        validate_upload(content_type.as_deref(), &data, state.config.max_upload_bytes)?;
        info!("Extracting text from {file_name} ({} bytes)", data.len());

        let text = extract_resume_text(data).await?;
        return Ok(Json(UploadResponse { text }));
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

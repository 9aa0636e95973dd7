use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::document::cleaning::clean_cover_letter;
use crate::document::docx::build_docx;
use crate::errors::AppError;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_DISPOSITION: &str = "attachment; filename=CoverLetter.docx";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterBody {
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// POST /generate-word
pub async fn handle_generate_word(Json(body): Json<CoverLetterBody>) -> Result<Response, AppError> {
    let cover_letter = body
        .cover_letter
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Cover letter content is required".to_string()))?;

    cover_letter_document(&cover_letter)
}

/// Cleans the draft markup and serves it as a Word attachment.
pub fn cover_letter_document(cover_letter: &str) -> Result<Response, AppError> {
    let paragraphs = clean_cover_letter(cover_letter);
    let bytes = build_docx(&paragraphs)?;
    info!("Generated Word document ({} paragraphs)", paragraphs.len());

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, DOCX_DISPOSITION),
        ],
        bytes,
    )
        .into_response())
}

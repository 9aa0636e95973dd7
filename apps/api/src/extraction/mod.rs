//! Résumé text extraction from uploaded PDFs.
//!
//! Validation runs before any parsing: only PDFs (by content type or `%PDF`
//! magic) within the configured size limit are accepted. `pdf-extract` is
//! CPU-bound and synchronous, so it runs on the blocking pool.

pub mod handlers;

use anyhow::anyhow;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF";

/// Rejects anything that is not a non-empty PDF under `max_bytes`.
pub fn validate_upload(
    content_type: Option<&str>,
    data: &[u8],
    max_bytes: usize,
) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if data.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "File too large: {} bytes (limit {max_bytes})",
            data.len()
        )));
    }

    let declared_pdf = content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
    });
    if !declared_pdf && !data.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("Only PDF files are allowed".to_string()));
    }

    Ok(())
}

/// Extracts plain text from PDF bytes. A PDF with no extractable text is a
/// validation error since nothing downstream can use it.
pub async fn extract_resume_text(data: Bytes) -> Result<String, AppError> {
    let size = data.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in PDF extraction: {e}")))?
        .map_err(|e| {
            warn!("PDF extraction failed: {e}");
            AppError::Internal(anyhow!("Failed to extract text from PDF: {e}"))
        })?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the PDF".to_string(),
        ));
    }

    debug!("Extracted {} chars from {size}-byte PDF", text.len());
    Ok(text)
}

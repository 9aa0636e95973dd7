use std::io::Cursor;

use anyhow::anyhow;
use docx_rs::{BreakType, Docx, LineSpacing, Paragraph, Run};
use tracing::debug;

use crate::errors::AppError;

/// Space after each paragraph, in twentieths of a point.
const PARAGRAPH_SPACING_AFTER: u32 = 200;

/// Packs cleaned paragraphs into a `.docx`. Newlines inside a paragraph
/// become line breaks within the same paragraph.
pub fn build_docx(paragraphs: &[String]) -> Result<Vec<u8>, AppError> {
    let docx = paragraphs
        .iter()
        .fold(Docx::new(), |doc, text| doc.add_paragraph(paragraph(text)));

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| AppError::Internal(anyhow!("Failed to pack Word document: {e}")))?;

    let bytes = cursor.into_inner();
    debug!("Packed {} paragraphs into {} bytes", paragraphs.len(), bytes.len());
    Ok(bytes)
}

fn paragraph(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line.trim());
    }

    Paragraph::new()
        .add_run(run)
        .line_spacing(LineSpacing::new().after(PARAGRAPH_SPACING_AFTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_zip_container() {
        let bytes = build_docx(&["Dear Hiring Manager,".to_string(), "Bye".to_string()]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_document_still_packs() {
        let bytes = build_docx(&[]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_spacer_paragraph_packs() {
        let bytes = build_docx(&["Hello".to_string(), String::new(), "Bye".to_string()]).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup tag regex is valid"));

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\n+").expect("paragraph break regex is valid"));

/// Turns edited cover letter markup into plain paragraphs.
///
/// Tags are removed, `&nbsp;` becomes a space, and the text is split on runs
/// of blank lines. Single newlines stay inside their paragraph. Blocks that
/// trim to nothing stay as empty spacer paragraphs.
pub fn clean_cover_letter(raw: &str) -> Vec<String> {
    let normalized = raw.replace("\r\n", "\n");
    let stripped = MARKUP_TAG.replace_all(&normalized, "");
    let text = stripped.replace("&nbsp;", " ");

    PARAGRAPH_BREAK
        .split(text.trim())
        .map(|p| p.trim().to_string())
        .collect()
}

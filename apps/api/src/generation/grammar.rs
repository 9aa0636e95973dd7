//! Response grammar: every parser that depends on the textual shape of model
//! output lives here, behind two functions.
//!
//! Both parsers are structural: they look only at marker literals and
//! delimiters. If the model drifts from the grammar requested in
//! `generation::prompts`, the result is `GrammarError::Unparseable` (options)
//! or fewer/odd rows (table). The table parse is positional and known to be
//! fragile: a model that reorders columns produces misattributed cells.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::errors::AppError;
use crate::generation::options::SectionOption;
use crate::generation::skill_matcher::{MatchLevel, MatchRecord};

/// Marker separating an option paragraph from its rationale.
pub const RATIONALE_MARKER: &str = "Why Choose This:";

const TABLE_DELIMITER: char = '|';
const TABLE_SEPARATOR_MARKER: &str = "---";

const DEFAULT_REQUIREMENT: &str = "Unknown Requirement";
const DEFAULT_EXPERIENCE: &str = "No matching experience found";

static OPTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Option \d+:").expect("option marker regex is valid"));

#[derive(Debug, Error, PartialEq)]
pub enum GrammarError {
    #[error("no 'Option N:' sections found in {0} characters of output")]
    Unparseable(usize),
}

impl From<GrammarError> for AppError {
    fn from(e: GrammarError) -> Self {
        AppError::UnparseableResponse(e.to_string())
    }
}

/// Splits raw section output into ordered options.
///
/// Text before the first `Option N:` marker is preamble and is discarded.
/// Each remaining chunk is split on `Why Choose This:`; later occurrences of
/// the marker stay part of the rationale. Empty chunks are dropped.
pub fn parse_options(raw: &str) -> Result<Vec<SectionOption>, GrammarError> {
    let mut chunks = OPTION_MARKER.split(raw);
    // Preamble (possibly empty) before the first marker.
    chunks.next();

    let options: Vec<SectionOption> = chunks
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let mut parts = chunk.split(RATIONALE_MARKER);
            let text = parts.next().unwrap_or_default().trim().to_string();
            let rationale = parts
                .collect::<Vec<_>>()
                .join(RATIONALE_MARKER)
                .trim()
                .to_string();
            SectionOption { text, rationale }
        })
        .collect();

    if options.is_empty() {
        return Err(GrammarError::Unparseable(raw.len()));
    }
    Ok(options)
}

/// Parses a pipe-delimited table into match records, in source order.
///
/// Keeps lines starting with `|` that are not `---` separator rows, drops the
/// first kept line as the header, and maps the remaining cells positionally.
/// Missing or blank cells take their documented defaults.
pub fn parse_match_table(raw: &str) -> Vec<MatchRecord> {
    let rows: Vec<Vec<&str>> = raw
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(TABLE_DELIMITER) && !line.contains(TABLE_SEPARATOR_MARKER))
        .map(|line| line.split(TABLE_DELIMITER).map(str::trim).collect())
        .collect();

    if rows.is_empty() {
        warn!(kind = "grammar_drift", "Skill match output contained no table rows");
    }

    rows.into_iter()
        .skip(1)
        .map(|cells| {
            // cells[0] is the empty string before the leading delimiter.
            let cell = |i: usize| cells.get(i).copied().filter(|c| !c.is_empty());
            MatchRecord {
                job_requirement: cell(1).unwrap_or(DEFAULT_REQUIREMENT).to_string(),
                relevant_experience: cell(2).unwrap_or(DEFAULT_EXPERIENCE).to_string(),
                match_level: cell(3).map(MatchLevel::from_cell).unwrap_or_default(),
            }
        })
        .collect()
}

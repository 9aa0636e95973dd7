//! Skill Matcher: asks the model for a requirement/evidence table and parses
//! it into `MatchRecord`s.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::generation::grammar::parse_match_table;
use crate::generation::prompt_builder::build_skill_match_prompt;
use crate::llm_client::GenerationClient;

/// Qualitative strength of a match. Defaults to `Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MatchLevel {
    High,
    Medium,
    #[default]
    Low,
}

impl MatchLevel {
    /// Reads a table cell such as `High` or `**medium**`.
    /// Anything unrecognized is `Low`.
    pub fn from_cell(cell: &str) -> Self {
        let cleaned = cell.trim().trim_matches('*').trim();
        if cleaned.eq_ignore_ascii_case("high") {
            MatchLevel::High
        } else if cleaned.eq_ignore_ascii_case("medium") {
            MatchLevel::Medium
        } else {
            if !cleaned.eq_ignore_ascii_case("low") {
                warn!("Unrecognized match level '{cleaned}', treating as Low");
            }
            MatchLevel::Low
        }
    }
}

/// One requirement from the job description paired with résumé evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub job_requirement: String,
    pub relevant_experience: String,
    pub match_level: MatchLevel,
}

/// Runs the skill matching call and parses the returned table.
pub async fn match_skills(
    llm: &dyn GenerationClient,
    resume_text: &str,
    job_description: &str,
) -> Result<Vec<MatchRecord>, AppError> {
    let payload = build_skill_match_prompt(resume_text, job_description);
    info!("Matching skills against job description");

    let raw = llm.generate(&payload).await?;
    debug!("Received {} characters of match table", raw.len());

    let records = parse_match_table(&raw);
    info!("Parsed {} match records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::prompts::SKILL_MATCH_EXAMPLE_TABLE;
    use crate::llm_client::mock::MockGenerationClient;
    use crate::llm_client::LlmError;

    #[test]
    fn test_match_level_from_cell() {
        assert_eq!(MatchLevel::from_cell("High"), MatchLevel::High);
        assert_eq!(MatchLevel::from_cell(" **medium** "), MatchLevel::Medium);
        assert_eq!(MatchLevel::from_cell("LOW"), MatchLevel::Low);
        assert_eq!(MatchLevel::from_cell("Partial"), MatchLevel::Low);
    }

    #[test]
    fn test_match_record_serializes_camel_case() {
        let record = MatchRecord {
            job_requirement: "Rust".into(),
            relevant_experience: "Wrote Rust".into(),
            match_level: MatchLevel::High,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["jobRequirement"], "Rust");
        assert_eq!(json["relevantExperience"], "Wrote Rust");
        assert_eq!(json["matchLevel"], "High");
    }

    #[tokio::test]
    async fn test_match_skills_with_example_table() {
        let llm = MockGenerationClient::always(SKILL_MATCH_EXAMPLE_TABLE);
        let resume = "Jane Doe\njane@x.com\n555-123-4567\nFive years of JavaScript and React.";
        let jd = "The role requires JavaScript, some Python and cloud infrastructure.";

        let records = match_skills(&llm, resume, jd).await.unwrap();

        let js = records
            .iter()
            .find(|r| r.job_requirement == "Proficiency in JavaScript")
            .unwrap();
        assert_eq!(js.match_level, MatchLevel::High);
        assert_eq!(llm.call_count(), 1);
        assert!(llm.payloads()[0].prompt.contains(resume));
    }

    #[tokio::test]
    async fn test_match_skills_propagates_empty_response() {
        let llm = MockGenerationClient::new(vec![Err(LlmError::EmptyResponse)]);
        let err = match_skills(&llm, "cv", "jd").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(LlmError::EmptyResponse)));
    }
}

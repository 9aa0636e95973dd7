//! Axum route handlers for the stateless generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::options::{generate_section_deduplicated, SectionOption};
use crate::generation::section::SectionId;
use crate::generation::skill_matcher::{match_skills, MatchRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationInput {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

impl GenerationInput {
    /// Rejects blank inputs before anything reaches the generation client.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.resume_text.trim().is_empty() {
            return Err(AppError::Validation("resumeText cannot be empty".to_string()));
        }
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "jobDescription cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSkillsResponse {
    pub matched_skills: Vec<MatchRecord>,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub options: Vec<SectionOption>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /match-skills
pub async fn handle_match_skills(
    State(state): State<AppState>,
    Json(input): Json<GenerationInput>,
) -> Result<Json<MatchSkillsResponse>, AppError> {
    input.validate()?;

    let matched_skills =
        match_skills(state.llm.as_ref(), &input.resume_text, &input.job_description).await?;

    Ok(Json(MatchSkillsResponse { matched_skills }))
}

/// POST /generate-open-hook
pub async fn handle_generate_open_hook(
    state: State<AppState>,
    input: Json<GenerationInput>,
) -> Result<Json<OptionsResponse>, AppError> {
    generate_section(SectionId::OpenHook, state, input).await
}

/// POST /generate-key-experiences
pub async fn handle_generate_key_experiences(
    state: State<AppState>,
    input: Json<GenerationInput>,
) -> Result<Json<OptionsResponse>, AppError> {
    generate_section(SectionId::KeyExperiences, state, input).await
}

/// POST /generate-personal-values
pub async fn handle_generate_personal_values(
    state: State<AppState>,
    input: Json<GenerationInput>,
) -> Result<Json<OptionsResponse>, AppError> {
    generate_section(SectionId::PersonalValues, state, input).await
}

/// POST /generate-closing-statement
pub async fn handle_generate_closing_statement(
    state: State<AppState>,
    input: Json<GenerationInput>,
) -> Result<Json<OptionsResponse>, AppError> {
    generate_section(SectionId::ClosingStatement, state, input).await
}

async fn generate_section(
    section: SectionId,
    State(state): State<AppState>,
    Json(input): Json<GenerationInput>,
) -> Result<Json<OptionsResponse>, AppError> {
    input.validate()?;

    let options = generate_section_deduplicated(
        state.llm.as_ref(),
        &state.dedup,
        section,
        &input.job_description,
        &input.resume_text,
    )
    .await?;

    Ok(Json(OptionsResponse { options }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_input_uses_camel_case() {
        let input: GenerationInput = serde_json::from_value(serde_json::json!({
            "resumeText": "Jane Doe",
            "jobDescription": "Rust engineer"
        }))
        .unwrap();
        assert_eq!(input.resume_text, "Jane Doe");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_fail_validation() {
        let input: GenerationInput =
            serde_json::from_value(serde_json::json!({ "resumeText": "Jane Doe" })).unwrap();
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));

        let blank: GenerationInput = serde_json::from_value(serde_json::json!({
            "resumeText": "   ",
            "jobDescription": "Rust engineer"
        }))
        .unwrap();
        assert!(matches!(blank.validate(), Err(AppError::Validation(_))));
    }
}

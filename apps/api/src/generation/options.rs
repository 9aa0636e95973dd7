//! Section Option Generator: one generation call per section, parsed into
//! candidate paragraphs with rationale.

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::dedup::{InFlightKey, RequestDeduplicator};
use crate::generation::grammar::parse_options;
use crate::generation::prompt_builder::build_section_prompt;
use crate::generation::section::SectionId;
use crate::llm_client::GenerationClient;

/// One candidate paragraph for a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOption {
    pub text: String,
    pub rationale: String,
}

/// Builds the section prompt, calls the generation client once and parses the
/// result. Grammar drift surfaces as `AppError::UnparseableResponse`.
pub async fn generate_options(
    llm: &dyn GenerationClient,
    section: SectionId,
    job_description: &str,
    resume_text: &str,
) -> Result<Vec<SectionOption>, AppError> {
    let payload = build_section_prompt(section, job_description, resume_text);
    info!("Generating options for section: {section}");

    let raw = llm.generate(&payload).await?;
    debug!("Received {} characters for {section}", raw.len());

    let options = parse_options(&raw)?;
    info!("Generated {} options for {section}", options.len());
    Ok(options)
}

/// `generate_options` guarded by the deduplicator. A second call for the same
/// (job description, résumé, section) while one is in flight is rejected with
/// `AppError::DuplicateRequest`; the key is released on every exit path.
pub async fn generate_section_deduplicated(
    llm: &dyn GenerationClient,
    dedup: &RequestDeduplicator,
    section: SectionId,
    job_description: &str,
    resume_text: &str,
) -> Result<Vec<SectionOption>, AppError> {
    let key = InFlightKey::derive(job_description, resume_text, section);
    let _guard = dedup.acquire(key).ok_or(AppError::DuplicateRequest)?;
    debug!(in_flight = dedup.len(), "Acquired generation key for {section}");

    generate_options(llm, section, job_description, resume_text).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::llm_client::mock::MockGenerationClient;
    use crate::llm_client::LlmError;

    const RAW: &str = "Option 1:\nHello.\n\nWhy Choose This: Friendly.\n\nOption 2:\nHi.\n\nWhy Choose This: Short.";

    #[tokio::test]
    async fn test_generate_options_parses_model_output() {
        let llm = MockGenerationClient::always(RAW);
        let options = generate_options(&llm, SectionId::OpenHook, "jd", "cv")
            .await
            .unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].text, "Hi.");
        assert!(llm.payloads()[0].prompt.starts_with("Write three opening"));
    }

    #[tokio::test]
    async fn test_generate_options_maps_drift_to_unparseable() {
        let llm = MockGenerationClient::always("I'd rather not.");
        let err = generate_options(&llm, SectionId::OpenHook, "jd", "cv")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnparseableResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_options_propagates_upstream_errors() {
        let llm = MockGenerationClient::new(vec![Err(LlmError::RateLimited)]);
        let err = generate_options(&llm, SectionId::PersonalValues, "jd", "cv")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream(LlmError::RateLimited)));
    }

    #[tokio::test]
    async fn test_dedup_key_released_after_failure() {
        let llm = MockGenerationClient::new(vec![
            Err(LlmError::Unavailable("connection reset".into())),
            Ok(RAW.to_string()),
        ]);
        let dedup = RequestDeduplicator::new();

        let first =
            generate_section_deduplicated(&llm, &dedup, SectionId::OpenHook, "jd", "cv").await;
        assert!(first.is_err());
        assert!(dedup.is_empty());

        let second =
            generate_section_deduplicated(&llm, &dedup, SectionId::OpenHook, "jd", "cv").await;
        assert_eq!(second.unwrap().len(), 2);
        assert!(dedup.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_identical_requests_reject_the_second() {
        let llm = Arc::new(MockGenerationClient::always(RAW).with_delay(Duration::from_millis(200)));
        let dedup = RequestDeduplicator::new();

        let first = {
            let llm = llm.clone();
            let dedup = dedup.clone();
            tokio::spawn(async move {
                generate_section_deduplicated(
                    llm.as_ref(),
                    &dedup,
                    SectionId::KeyExperiences,
                    "jd",
                    "cv",
                )
                .await
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = generate_section_deduplicated(
            llm.as_ref(),
            &dedup,
            SectionId::KeyExperiences,
            "jd",
            "cv",
        )
        .await;
        assert!(matches!(second, Err(AppError::DuplicateRequest)));

        // A different section is not serialized behind the first.
        let other = generate_section_deduplicated(
            llm.as_ref(),
            &dedup,
            SectionId::ClosingStatement,
            "jd",
            "cv",
        )
        .await;
        assert!(other.is_ok());

        assert!(first.await.unwrap().is_ok());
        assert_eq!(llm.call_count(), 2);
    }
}

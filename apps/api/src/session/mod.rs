// Server-side cover letter sessions: one progression state machine per
// session, held in memory only. Nothing survives a restart.

pub mod handlers;
pub mod progression;
pub mod store;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::document::draft::{assemble_draft, PersonalDetails};
use crate::errors::AppError;
use crate::generation::dedup::{InFlightKey, RequestDeduplicator};
use crate::generation::options::generate_options;
use crate::llm_client::GenerationClient;
use crate::session::progression::{PendingGeneration, ProgressionError, ProgressionState};

pub use store::SessionStore;

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub resume_text: String,
    pub job_description: String,
    pub details: PersonalDetails,
    pub letter_date: NaiveDate,
    pub progression: ProgressionState,
    /// Direct user edit of the assembled draft. Dropped whenever a selection changes.
    pub edited_draft: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(resume_text: String, job_description: String) -> Self {
        let details = PersonalDetails::from_resume(&resume_text);
        Self {
            id: Uuid::new_v4(),
            resume_text,
            job_description,
            details,
            letter_date: Local::now().date_naive(),
            progression: ProgressionState::new(),
            edited_draft: None,
            created_at: Utc::now(),
        }
    }

    pub fn select(&mut self, option_text: &str) -> Result<(), ProgressionError> {
        self.progression.select(option_text)?;
        self.edited_draft = None;
        Ok(())
    }

    /// The user's edited draft if there is one, otherwise the assembled template.
    pub fn draft(&self) -> Result<String, ProgressionError> {
        let selections = self.progression.selections()?;
        if let Some(edited) = &self.edited_draft {
            return Ok(edited.clone());
        }
        Ok(assemble_draft(&self.details, self.letter_date, &selections))
    }

    pub fn edit_draft(&mut self, cover_letter: String) -> Result<(), ProgressionError> {
        if !self.progression.is_assembling() {
            return Err(ProgressionError::NotAssembling);
        }
        self.edited_draft = Some(cover_letter);
        Ok(())
    }
}

/// Runs one progression transition on a shared session.
///
/// `begin` runs under the session lock. If it asks for a generation, the
/// in-flight key is claimed before the lock is released, so an identical
/// request arriving meanwhile is rejected with `DuplicateRequest` instead of
/// waiting. The generation call itself runs unlocked; its result is applied
/// under the lock to the section it was requested for, and only then is the
/// key released.
pub async fn transition<F>(
    handle: &Mutex<Session>,
    llm: &dyn GenerationClient,
    dedup: &RequestDeduplicator,
    begin: F,
) -> Result<(), AppError>
where
    F: FnOnce(&mut ProgressionState) -> Result<Option<PendingGeneration>, ProgressionError>,
{
    let (pending, job_description, resume_text, _guard) = {
        let mut session = handle.lock().await;
        let Some(pending) = begin(&mut session.progression)? else {
            return Ok(());
        };

        let key = InFlightKey::derive(&session.job_description, &session.resume_text, pending.section);
        let Some(guard) = dedup.acquire(key) else {
            return Err(session.progression.fail(pending, AppError::DuplicateRequest));
        };
        (
            pending,
            session.job_description.clone(),
            session.resume_text.clone(),
            guard,
        )
    };

    let result = generate_options(llm, pending.section, &job_description, &resume_text).await;

    let mut session = handle.lock().await;
    session.progression.complete(pending, result)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::generation::section::SectionId;
    use crate::llm_client::mock::MockGenerationClient;

    const RAW: &str = "Option 1:\nFirst.\n\nWhy Choose This: One.\n\nOption 2:\nSecond.\n\nWhy Choose This: Two.";

    async fn assembled_session(llm: &MockGenerationClient) -> Session {
        let dedup = RequestDeduplicator::new();
        let handle = Mutex::new(Session::new(
            "Jane Doe\njane@x.com\n555-123-4567".to_string(),
            "Rust engineer".to_string(),
        ));

        transition(&handle, llm, &dedup, |p| Ok(p.begin_visit(SectionId::OpenHook)))
            .await
            .unwrap();
        for _ in 0..4 {
            handle.lock().await.select("Option 1: First.").unwrap();
            transition(&handle, llm, &dedup, |p| p.begin_advance()).await.unwrap();
        }
        assert!(dedup.is_empty());
        handle.into_inner()
    }

    #[tokio::test]
    async fn test_session_generation_goes_through_client() {
        let llm = MockGenerationClient::always(RAW);
        let session = assembled_session(&llm).await;
        assert_eq!(llm.call_count(), 4);
        assert!(session.progression.is_assembling());
        assert!(llm.payloads()[0].prompt.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn test_draft_requires_assembling() {
        let session = Session::new("Jane".into(), "Rust".into());
        assert_eq!(session.draft(), Err(ProgressionError::NotAssembling));
    }

    #[tokio::test]
    async fn test_edit_replaces_draft_until_selection_changes() {
        let llm = MockGenerationClient::always(RAW);
        let mut session = assembled_session(&llm).await;

        let assembled = session.draft().unwrap();
        assert!(assembled.contains("Dear Hiring Manager,"));
        assert!(assembled.contains("First."));

        session.edit_draft("My own letter".to_string()).unwrap();
        assert_eq!(session.draft().unwrap(), "My own letter");

        // Selecting requires leaving Assembling first.
        assert_eq!(session.progression.begin_back(), None);
        session.select("A new closing").unwrap();
        assert_eq!(session.edited_draft, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_identical_transition_in_flight_is_rejected() {
        let llm = Arc::new(MockGenerationClient::always(RAW).with_delay(Duration::from_millis(200)));
        let dedup = RequestDeduplicator::new();
        let handle = Arc::new(Mutex::new(Session::new("Jane Doe".into(), "Rust engineer".into())));
        transition(&handle, llm.as_ref(), &dedup, |p| Ok(p.begin_visit(SectionId::OpenHook)))
            .await
            .unwrap();

        let first = {
            let (handle, llm, dedup) = (handle.clone(), llm.clone(), dedup.clone());
            tokio::spawn(async move {
                transition(&handle, llm.as_ref(), &dedup, |p| p.begin_regenerate().map(Some)).await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        // The session stays readable while the first call is in flight.
        let view = handle.try_lock().map(|s| s.progression.active_step());
        assert_eq!(view.ok(), Some(0));

        let second =
            transition(&handle, llm.as_ref(), &dedup, |p| p.begin_regenerate().map(Some)).await;
        assert!(matches!(second, Err(AppError::DuplicateRequest)));

        assert!(first.await.unwrap().is_ok());
        assert_eq!(llm.call_count(), 2);

        let session = handle.lock().await;
        let hook = session.progression.section(SectionId::OpenHook).unwrap();
        assert_eq!(hook.previous_options.len(), 2);
        assert!(dedup.is_empty());
    }
}

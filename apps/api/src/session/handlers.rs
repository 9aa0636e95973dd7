//! Axum route handlers for progression sessions.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::document::handlers::{cover_letter_document, CoverLetterBody};
use crate::errors::AppError;
use crate::generation::handlers::GenerationInput;
use crate::generation::section::SectionId;
use crate::session::progression::SectionState;
use crate::session::{transition, Session};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: Uuid,
    pub active_step: usize,
    pub active_section: SectionId,
    pub assembling: bool,
    pub sections: BTreeMap<SectionId, SectionState>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let progression = &session.progression;
        SessionView {
            session_id: session.id,
            active_step: progression.active_step(),
            active_section: progression.active_section(),
            assembling: progression.is_assembling(),
            sections: progression.sections().clone(),
            error: progression.error().map(str::to_string),
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    #[serde(default)]
    pub text: String,
}

/// Which transition a step handler should run.
enum Step {
    Regenerate,
    Advance,
    Back,
    GoTo(SectionId),
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /sessions
///
/// Creates a session and generates the first section. A failed first
/// generation still creates the session; the view carries the error and the
/// client retries with `regenerate`.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(input): Json<GenerationInput>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    input.validate()?;

    let handle = state
        .sessions
        .insert(Session::new(input.resume_text, input.job_description))
        .await;

    if let Err(e) = transition(&handle, state.llm.as_ref(), &state.dedup, |p| {
        Ok(p.begin_visit(SectionId::OpenHook))
    })
    .await
    {
        warn!("Initial generation failed: {e}");
    }

    let session = handle.lock().await;
    Ok((StatusCode::CREATED, Json(SessionView::from(&*session))))
}

/// GET /sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

/// DELETE /sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /sessions/:id/select
pub async fn handle_select(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.select(&request.text)?;
    Ok(Json(SessionView::from(&*session)))
}

/// POST /sessions/:id/regenerate
pub async fn handle_regenerate(
    state: State<AppState>,
    id: Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    run_step(state, id, Step::Regenerate).await
}

/// POST /sessions/:id/advance
pub async fn handle_advance(
    state: State<AppState>,
    id: Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    run_step(state, id, Step::Advance).await
}

/// POST /sessions/:id/back
pub async fn handle_back(
    state: State<AppState>,
    id: Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    run_step(state, id, Step::Back).await
}

/// POST /sessions/:id/steps/:section
pub async fn handle_go_to(
    state: State<AppState>,
    Path((id, section)): Path<(Uuid, String)>,
) -> Result<Json<SessionView>, AppError> {
    let section: SectionId = section.parse()?;
    run_step(state, Path(id), Step::GoTo(section)).await
}

/// GET /sessions/:id/draft
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverLetterBody>, AppError> {
    let handle = state.sessions.get(id).await?;
    let session = handle.lock().await;
    Ok(Json(CoverLetterBody {
        cover_letter: Some(session.draft()?),
    }))
}

/// PUT /sessions/:id/draft
pub async fn handle_edit_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CoverLetterBody>,
) -> Result<Json<CoverLetterBody>, AppError> {
    let cover_letter = body
        .cover_letter
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Cover letter content is required".to_string()))?;

    let handle = state.sessions.get(id).await?;
    let mut session = handle.lock().await;
    session.edit_draft(cover_letter)?;
    Ok(Json(CoverLetterBody {
        cover_letter: Some(session.draft()?),
    }))
}

/// POST /sessions/:id/document
pub async fn handle_session_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let handle = state.sessions.get(id).await?;
    let draft = handle.lock().await.draft()?;
    cover_letter_document(&draft)
}

async fn run_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    step: Step,
) -> Result<Json<SessionView>, AppError> {
    let handle = state.sessions.get(id).await?;

    transition(&handle, state.llm.as_ref(), &state.dedup, |progression| match step {
        Step::Regenerate => progression.begin_regenerate().map(Some),
        Step::Advance => progression.begin_advance(),
        Step::Back => Ok(progression.begin_back()),
        Step::GoTo(section) => progression.begin_go_to(section),
    })
    .await?;

    let session = handle.lock().await;
    Ok(Json(SessionView::from(&*session)))
}

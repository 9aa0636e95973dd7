pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::document::handlers as document;
use crate::extraction::handlers as extraction;
use crate::generation::handlers as generation;
use crate::session::handlers as session;
use crate::state::AppState;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Résumé intake
        .route(
            "/upload-resume",
            post(extraction::handle_upload_resume).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Stateless generation
        .route("/match-skills", post(generation::handle_match_skills))
        .route(
            "/generate-open-hook",
            post(generation::handle_generate_open_hook),
        )
        .route(
            "/generate-key-experiences",
            post(generation::handle_generate_key_experiences),
        )
        .route(
            "/generate-personal-values",
            post(generation::handle_generate_personal_values),
        )
        .route(
            "/generate-closing-statement",
            post(generation::handle_generate_closing_statement),
        )
        .route("/generate-word", post(document::handle_generate_word))
        // Progression sessions
        .route("/sessions", post(session::handle_create_session))
        .route(
            "/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route("/sessions/:id/select", post(session::handle_select))
        .route("/sessions/:id/regenerate", post(session::handle_regenerate))
        .route("/sessions/:id/advance", post(session::handle_advance))
        .route("/sessions/:id/back", post(session::handle_back))
        .route(
            "/sessions/:id/steps/:section",
            post(session::handle_go_to),
        )
        .route(
            "/sessions/:id/draft",
            get(session::handle_get_draft).put(session::handle_edit_draft),
        )
        .route(
            "/sessions/:id/document",
            post(session::handle_session_document),
        )
        .with_state(state)
}

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::generation::dedup::RequestDeduplicator;
use crate::llm_client::GenerationClient;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn GenerationClient>,
    /// In-flight generation keys shared by the stateless endpoints and sessions.
    pub dedup: RequestDeduplicator,
    pub sessions: SessionStore,
    pub config: Config,
}

impl AppState {
    pub fn new(llm: Arc<dyn GenerationClient>, config: Config) -> Self {
        AppState {
            llm,
            dedup: RequestDeduplicator::new(),
            sessions: SessionStore::new(Duration::from_secs(config.session_idle_secs)),
            config,
        }
    }
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(llm: Arc<dyn GenerationClient>) -> Self {
        Self::new(llm, Config::for_tests())
    }
}

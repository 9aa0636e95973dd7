use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::Session;

struct Entry {
    session: Arc<Mutex<Session>>,
    last_access: Instant,
}

/// In-memory session registry. Each session sits behind its own lock so a
/// request on one session never blocks another.
///
/// Sessions idle for longer than `idle_timeout` are dropped: expired entries
/// are swept on every insert and by `run_sweeper`, and an expired session is
/// never handed out by `get`.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    pub async fn insert(&self, session: Session) -> Arc<Mutex<Session>> {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        let now = Instant::now();

        let mut sessions = self.sessions.write().await;
        let swept = self.sweep_locked(&mut sessions, now);
        sessions.insert(
            id,
            Entry {
                session: handle.clone(),
                last_access: now,
            },
        );
        info!(
            "Created session {id} ({} active, {swept} expired)",
            sessions.len()
        );
        handle
    }

    /// Returns the session and refreshes its idle timer.
    pub async fn get(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, AppError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let expired = match sessions.get_mut(&id) {
            Some(entry) if now.duration_since(entry.last_access) <= self.idle_timeout => {
                entry.last_access = now;
                return Ok(entry.session.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            sessions.remove(&id);
            debug!("Session {id} expired");
        }
        Err(AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!("Removed session {id}"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// Drops every idle session. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.sweep_locked(&mut sessions, Instant::now())
    }

    /// Sweeps once per `period`, forever.
    pub async fn run_sweeper(self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let swept = self.sweep().await;
            if swept > 0 {
                info!("Expired {swept} idle sessions");
            }
        }
    }

    fn sweep_locked(&self, sessions: &mut HashMap<Uuid, Entry>, now: Instant) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_access) <= self.idle_timeout);
        before - sessions.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

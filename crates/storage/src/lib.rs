use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use shared::domain::{SessionId, SessionState};
use tokio::sync::RwLock;
use tracing::debug;

/// Ephemeral server-side session storage. Cloning shares the same map.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<RwLock<HashMap<SessionId, StoredSession>>>,
    idle_ttl: Duration,
}

#[derive(Debug, Clone)]
struct StoredSession {
    state: SessionState,
    touched_at: DateTime<Utc>,
}

impl StoredSession {
    fn is_expired(&self, now: DateTime<Utc>, idle_ttl: Duration) -> bool {
        now - self.touched_at >= idle_ttl
    }
}

impl SessionStore {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    pub async fn load(&self, session_id: SessionId) -> Option<SessionState> {
        self.load_at(session_id, Utc::now()).await
    }

    pub async fn load_at(&self, session_id: SessionId, now: DateTime<Utc>) -> Option<SessionState> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&session_id)?;
        if entry.is_expired(now, self.idle_ttl) {
            entries.remove(&session_id);
            debug!(session_id = %session_id.0, "dropped expired session on load");
            return None;
        }
        entry.touched_at = now;
        Some(entry.state.clone())
    }

    pub async fn save(&self, session_id: SessionId, state: SessionState) {
        self.save_at(session_id, state, Utc::now()).await;
    }

    pub async fn save_at(&self, session_id: SessionId, state: SessionState, now: DateTime<Utc>) {
        self.entries.write().await.insert(
            session_id,
            StoredSession {
                state,
                touched_at: now,
            },
        );
    }

    pub async fn remove(&self, session_id: SessionId) -> bool {
        self.entries.write().await.remove(&session_id).is_some()
    }

    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now()).await
    }

    pub async fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        let idle_ttl = self.idle_ttl;
        entries.retain(|_, entry| !entry.is_expired(now, idle_ttl));
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

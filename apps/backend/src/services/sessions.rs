//! In-memory quiz session store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::{QuizSession, SessionEntry};

/// Idle time after which a session is dropped
pub const DEFAULT_SESSION_TTL_SECS: i64 = 2 * 60 * 60;

/// Sessions keyed by ID. One request mutates a session at a time.
///
/// Sessions idle for longer than the TTL are purged whenever a new one is
/// created, and are no longer reachable once expired.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(DEFAULT_SESSION_TTL_SECS))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Store a new session and return its ID.
    pub fn insert(&self, session: QuizSession) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let entry = SessionEntry {
            session,
            created_at: now,
            last_seen_at: now,
        };

        let mut sessions = self.lock()?;
        Self::purge(&mut sessions, now - self.ttl);
        sessions.insert(id, entry);
        tracing::info!(session_id = %id, active = sessions.len(), "Session created");
        Ok(id)
    }

    /// Run `f` against a session after committing any due card transition.
    pub fn with_session<T>(&self, id: Uuid, f: impl FnOnce(&mut SessionEntry) -> T) -> Result<T> {
        let now = Utc::now();
        let mut sessions = self.lock()?;

        let expired = sessions
            .get(&id)
            .is_some_and(|entry| entry.last_seen_at < now - self.ttl);
        if expired {
            sessions.remove(&id);
            tracing::info!(session_id = %id, "Session expired");
        }

        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Session {id}")))?;
        entry.last_seen_at = now;
        entry.session.poll();
        Ok(f(entry))
    }

    pub fn remove(&self, id: Uuid) -> Result<()> {
        self.lock()?
            .remove(&id)
            .map(|_| tracing::info!(session_id = %id, "Session removed"))
            .ok_or_else(|| ApiError::NotFound(format!("Session {id}")))
    }

    /// Drop every session idle for longer than the TTL as of `now`.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut sessions = self.lock()?;
        Ok(Self::purge(&mut sessions, now - self.ttl))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn purge(sessions: &mut HashMap<Uuid, SessionEntry>, cutoff: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen_at >= cutoff);
        let purged = before - sessions.len();
        if purged > 0 {
            tracing::info!(purged, "Expired sessions purged");
        }
        purged
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, SessionEntry>>> {
        self.sessions
            .lock()
            .map_err(|_| ApiError::Internal("session store lock poisoned".to_string()))
    }
}

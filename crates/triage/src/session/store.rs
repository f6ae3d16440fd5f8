//! Session persistence over a key-value store.

use log::{debug, error, warn};
use std::sync::Arc;
use tracing::instrument;

use super::id::now_millis;
use super::models::{ChatMessage, StoredSession};
use crate::location::LocationFix;
use crate::storage::KeyValueStore;

/// Namespace for session records in the key-value store.
pub const SESSION_KEY_PREFIX: &str = "medical-chat-";

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Repository of persisted sessions.
///
/// Storage failures never reach the caller: they are logged and the
/// operation degrades to a no-op (or an absent result).
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            clock: Arc::new(now_millis),
        }
    }

    /// Replace the timestamp source (milliseconds since the epoch).
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn key(session_id: &str) -> String {
        format!("{SESSION_KEY_PREFIX}{session_id}")
    }

    /// Write the full session, keeping the creation time of any existing
    /// record under the same ID.
    #[instrument(skip(self, messages, location), fields(messages = messages.len()))]
    pub async fn save(&self, session_id: &str, messages: &[ChatMessage], location: &LocationFix) {
        let now = (self.clock)();
        let created_at = self
            .load(session_id)
            .await
            .map(|existing| existing.created_at)
            .unwrap_or(now);

        let session = StoredSession {
            session_id: session_id.to_string(),
            messages: messages.to_vec(),
            location_data: location.clone(),
            created_at,
            updated_at: now,
        };

        let json = match serde_json::to_string(&session) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize session {}: {}", session_id, e);
                return;
            }
        };

        if let Err(e) = self.store.set(&Self::key(session_id), &json).await {
            error!("Failed to save session {}: {}", session_id, e);
        }
    }

    /// Load a session. Missing, unreadable, and corrupt records are all
    /// reported as absent.
    #[instrument(skip(self))]
    pub async fn load(&self, session_id: &str) -> Option<StoredSession> {
        let data = match self.store.get(&Self::key(session_id)).await {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(e) => {
                error!("Failed to load session {}: {}", session_id, e);
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Discarding corrupt session {}: {}", session_id, e);
                None
            }
        }
    }

    /// All sessions, most recently updated first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Vec<StoredSession> {
        let keys = match self.store.list_keys(SESSION_KEY_PREFIX).await {
            Ok(keys) => keys,
            Err(e) => {
                error!("Failed to list sessions: {}", e);
                return vec![];
            }
        };

        let mut sessions = Vec::with_capacity(keys.len());
        for key in keys {
            match self.store.get(&key).await {
                Ok(Some(data)) => match serde_json::from_str::<StoredSession>(&data) {
                    Ok(session) => sessions.push(session),
                    Err(e) => warn!("Failed to parse session {}: {}", key, e),
                },
                Ok(None) => debug!("Session {} vanished while listing", key),
                Err(e) => error!("Failed to read session {}: {}", key, e),
            }
        }

        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sessions
    }

    /// Delete a session.
    #[instrument(skip(self))]
    pub async fn remove(&self, session_id: &str) {
        if let Err(e) = self.store.delete(&Self::key(session_id)).await {
            error!("Failed to delete session {}: {}", session_id, e);
        }
    }

    /// Whether a record exists under the ID, parseable or not.
    pub async fn exists(&self, session_id: &str) -> bool {
        match self.store.contains(&Self::key(session_id)).await {
            Ok(exists) => exists,
            Err(e) => {
                error!("Failed to check session {}: {}", session_id, e);
                false
            }
        }
    }
}

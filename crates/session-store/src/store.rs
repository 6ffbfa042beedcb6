//! In-memory session storage with TTL expiration.

use crate::types::{ChatSession, TurnRole};
use openai_client::Message;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

struct SessionEntry {
    session: ChatSession,
    expires_at: Instant,
}

/// In-memory session store with automatic TTL expiration.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    max_turns: usize,
    ttl: Duration,
}

impl SessionStore {
    /// Create a new store.
    ///
    /// Spawns a background task that removes expired sessions every minute,
    /// so this must be called inside a Tokio runtime.
    pub fn new(max_turns: usize, ttl: Duration) -> Self {
        let store = Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_turns,
            ttl,
        };

        let cleanup_store = store.clone();
        tokio::spawn(async move {
            cleanup_store.cleanup_loop().await;
        });

        info!(max_turns, ttl = ?ttl, "Session store initialized");

        store
    }

    async fn cleanup_loop(&self) {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        interval.tick().await;

        loop {
            interval.tick().await;
            let removed = self.remove_expired().await;
            if removed > 0 {
                debug!(removed, "Cleaned up expired sessions");
            }
        }
    }

    async fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        before - sessions.len()
    }

    /// Create an empty session, replacing any existing one with the same id.
    #[instrument(skip(self))]
    pub async fn create(&self, id: &str) -> ChatSession {
        let session = ChatSession::new(id);
        self.sessions.write().await.insert(
            id.to_string(),
            SessionEntry {
                session: session.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        session
    }

    /// Get a live session.
    pub async fn get(&self, id: &str) -> Option<ChatSession> {
        let sessions = self.sessions.read().await;
        let now = Instant::now();

        sessions
            .get(id)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.session.clone())
    }

    /// Append a turn, creating the session if needed, and refresh its TTL.
    #[instrument(skip(self, content))]
    pub async fn append(&self, id: &str, role: TurnRole, content: &str) -> ChatSession {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let expires_at = now + self.ttl;

        let entry = sessions
            .entry(id.to_string())
            .and_modify(|entry| {
                if entry.expires_at <= now {
                    entry.session = ChatSession::new(id);
                }
            })
            .or_insert_with(|| SessionEntry {
                session: ChatSession::new(id),
                expires_at,
            });

        entry.expires_at = expires_at;
        entry.session.add_turn(role, content);
        entry.session.trim(self.max_turns);

        debug!(turns = entry.session.turns.len(), "Turn appended");

        entry.session.clone()
    }

    /// Remove a session. Returns whether it existed.
    #[instrument(skip(self))]
    pub async fn clear(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            info!("Cleared session");
        }
        removed
    }

    /// Session history as chat messages, led by an optional system prompt.
    pub async fn history_messages(&self, id: &str, system_prompt: Option<&str>) -> Vec<Message> {
        let mut messages = Vec::new();
        if let Some(prompt) = system_prompt {
            messages.push(Message::system(prompt));
        }
        if let Some(session) = self.get(id).await {
            messages.extend(session.messages());
        }
        messages
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        let now = Instant::now();
        sessions.values().filter(|entry| entry.expires_at > now).count()
    }
}

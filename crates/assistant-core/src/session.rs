//! Session Management
//!
//! Per-conversation turn history, owned exclusively by the store.
//! One session per chat: the transport's chat id is the session key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::turn::{History, Turn};

/// Unique session identifier (the conversation identity)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single conversation's state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Conversation identity
    pub id: SessionId,

    /// Ordered turn history
    pub history: History,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            history: History::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_system_prompt(id: SessionId, prompt: impl Into<String>) -> Self {
        let mut session = Self::new(id);
        session.history = History::with_system_prompt(prompt);
        session
    }

    /// Append a turn at the tail
    pub fn push(&mut self, turn: Turn) {
        self.history.push(turn);
        self.touch();
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Turn count
    pub fn turn_count(&self) -> usize {
        self.history.len()
    }
}

/// A session entry: the async mutex serializes whole turns, so a second
/// inbound message for the same conversation waits until the prior one
/// has finished orchestrating.
pub type SessionRef = Arc<tokio::sync::Mutex<Session>>;

/// In-memory session store.
///
/// Process-lifetime state: sessions are created lazily and never
/// explicitly destroyed. The outer lock guards only map lookup/insert;
/// each session's own lock is held across a whole turn, so independent
/// conversations proceed in parallel while one conversation's turns
/// stay strictly sequential.
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, SessionRef>>,
    system_prompt: Option<String>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            system_prompt: None,
        }
    }

    /// Seed every new session with a leading system turn
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            system_prompt: Some(prompt.into()),
        }
    }

    /// Look up a session, lazily creating it on first reference
    pub fn get_or_create(&self, id: &SessionId) -> SessionRef {
        let mut sessions = self.sessions.lock().unwrap_or_else(|e| e.into_inner());
        sessions
            .entry(id.clone())
            .or_insert_with(|| {
                let session = match &self.system_prompt {
                    Some(prompt) => Session::with_system_prompt(id.clone(), prompt),
                    None => Session::new(id.clone()),
                };
                Arc::new(tokio::sync::Mutex::new(session))
            })
            .clone()
    }

    /// Look up an existing session without creating one
    pub fn get(&self, id: &SessionId) -> Option<SessionRef> {
        self.sessions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

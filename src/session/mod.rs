//! Client-side authentication session
//!
//! The session is the client's belief about whether, and as whom, it is
//! authenticated. It lives in a [`SessionStore`] shared by the request
//! dispatcher (which reads the token on every call and clears the store on a
//! 401) and the [`SessionController`] (which mirrors it as a reactive
//! [`AuthState`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::broadcast;

pub mod controller;
pub mod memory;
pub mod store;

pub use controller::{AuthState, SessionController, SessionPhase};
#[allow(unused_imports)]
pub use memory::MemorySessionStore;
pub use store::FileSessionStore;

use crate::error::Result;

/// Buffered store notifications per subscriber before it is considered lagging
const EVENT_CAPACITY: usize = 16;

/// Identity fields as returned by the server.
///
/// The shape is owned by the backend; the client only reads optional fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(Map<String, Value>);

impl UserProfile {
    /// A non-empty string field, if present
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Server-side user id. The backend has used several spellings.
    pub fn user_id(&self) -> Option<&str> {
        ["userId", "user_id", "_id", "id"]
            .iter()
            .find_map(|key| self.get_str(key))
    }

    pub fn username(&self) -> Option<&str> {
        self.get_str("username")
    }

    pub fn email(&self) -> Option<&str> {
        self.get_str("email")
    }

    /// Name shown to the user: first/last name, then username, then email.
    pub fn display_name(&self) -> Option<String> {
        match (self.get_str("firstName"), self.get_str("lastName")) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.to_string()),
            (None, Some(last)) => Some(last.to_string()),
            (None, None) => self.username().or(self.email()).map(str::to_string),
        }
    }
}

/// Persisted credential and cached identity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
}

impl Session {
    /// Session for a freshly issued token. An empty token counts as no token.
    pub fn new(token: &str, user: Option<&UserProfile>) -> Self {
        Self {
            token: Some(token.to_string()).filter(|t| !t.is_empty()),
            user: user.cloned(),
        }
    }

    /// A session without a token is anonymous, whatever the cached user says
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Store mutation notification
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A new session was written
    Saved(Session),
    /// The session was removed (logout or server-side invalidation)
    Cleared,
}

/// Durable home of the session.
///
/// Shared by the dispatcher and the controller; implementations serialize
/// their own mutations, but callers do not coordinate with each other, so
/// the last write wins.
pub trait SessionStore: Send + Sync {
    /// Persist a token and identity, replacing whatever was stored
    fn save(&self, token: &str, user: Option<&UserProfile>) -> Result<()>;

    /// Current session. Missing or unreadable fields are absent.
    fn read(&self) -> Session;

    /// Remove the token and identity. Idempotent.
    fn clear(&self);

    /// Receive a notification for every subsequent save or clear
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

/// Broadcast fan-out shared by store implementations
#[derive(Debug)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    /// Notify subscribers; having none is fine
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

//! In-memory session store

use std::sync::Mutex;

use tokio::sync::broadcast;

use super::{Session, SessionEvent, SessionEvents, SessionStore, UserProfile};
use crate::error::Result;

/// Session store that lives only as long as the process.
///
/// Substitutes for [`FileSessionStore`](super::FileSessionStore) in tests.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Session>,
    events: SessionEvents,
}

#[allow(dead_code)]
impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing session (no event is emitted)
    pub fn with_session(token: &str, user: Option<UserProfile>) -> Self {
        Self {
            session: Mutex::new(Session::new(token, user.as_ref())),
            events: SessionEvents::new(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, token: &str, user: Option<&UserProfile>) -> Result<()> {
        let session = Session::new(token, user);
        let mut current = self.lock();
        *current = session.clone();
        // Emit under the lock so events arrive in write order
        self.events.emit(SessionEvent::Saved(session));
        Ok(())
    }

    fn read(&self) -> Session {
        self.lock().clone()
    }

    fn clear(&self) {
        let mut current = self.lock();
        *current = Session::default();
        self.events.emit(SessionEvent::Cleared);
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

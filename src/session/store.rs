//! File-backed session store
//!
//! Keeps the auth token and the cached user profile in a small JSON file so a
//! session survives between invocations. The two keys mirror what the web
//! client keeps in local storage: `authToken` and `user`.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use super::{Session, SessionEvent, SessionEvents, SessionStore, UserProfile};
use crate::config::Config;
use crate::error::Result;

/// On-disk layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,

    /// Kept as raw JSON so a malformed profile degrades to "absent"
    /// instead of discarding the token with it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<Value>,
}

/// Session store persisted to `session.json`
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
    events: SessionEvents,
}

impl FileSessionStore {
    /// Store at an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            events: SessionEvents::new(),
        }
    }

    /// Store that belongs to the given (or default) config file
    pub fn for_config(config_path: Option<&str>) -> Result<Self> {
        Ok(Self::new(Config::session_path(config_path)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load(&self) -> PersistedSession {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return PersistedSession::default(),
            Err(e) => {
                log::warn!("Failed to read session {}: {}", self.path.display(), e);
                return PersistedSession::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|e| {
            log::warn!("Ignoring corrupt session {}: {}", self.path.display(), e);
            PersistedSession::default()
        })
    }

    fn write(&self, persisted: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(persisted)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        // The token is a credential: owner read/write only, from creation on
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;

        // `mode` only applies to new files; tighten one left by an older run
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = file.metadata()?.permissions();
            if perms.mode() & 0o777 != 0o600 {
                perms.set_mode(0o600);
                file.set_permissions(perms)?;
            }
        }

        file.write_all(contents.as_bytes())?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, token: &str, user: Option<&UserProfile>) -> Result<()> {
        let session = Session::new(token, user);
        let persisted = PersistedSession {
            auth_token: session.token.clone(),
            user: user.map(serde_json::to_value).transpose()?,
        };

        // Emit under the lock so events arrive in write order
        let _guard = self.guard();
        self.write(&persisted)?;
        self.events.emit(SessionEvent::Saved(session));
        Ok(())
    }

    fn read(&self) -> Session {
        let persisted = {
            let _guard = self.guard();
            self.load()
        };

        let user = persisted.user.and_then(|value| {
            serde_json::from_value::<UserProfile>(value)
                .map_err(|e| log::warn!("Ignoring cached user profile: {}", e))
                .ok()
        });

        Session {
            token: persisted.auth_token.filter(|t| !t.is_empty()),
            user,
        }
    }

    fn clear(&self) {
        let _guard = self.guard();
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                log::warn!("Failed to remove session {}: {}", self.path.display(), e);
                // Fall back to blanking the file so the token is unusable
                if let Err(e) = self.write(&PersistedSession::default()) {
                    log::warn!("Failed to blank session {}: {}", self.path.display(), e);
                }
            }
        }

        self.events.emit(SessionEvent::Cleared);
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

//! Session controller
//!
//! Facade the commands use to sign in and out. It mirrors the session store
//! as a reactive [`AuthState`] and keeps that mirror current even when the
//! store is cleared by someone else, typically the request dispatcher after a
//! 401.
//!
//! ```text
//! Loading ──► Authenticated ◄──► Anonymous
//!    └──────────────────────────────▲
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use super::{Session, SessionEvent, SessionStore, UserProfile};
use crate::client::AuthApi;
use crate::client::models::{SignupRequest, UsernameAvailability};
use crate::error::Result;

/// Observable authentication state
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    /// True until the store has been read once
    pub loading: bool,
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
}

impl AuthState {
    fn loading() -> Self {
        Self {
            loading: true,
            is_authenticated: false,
            user: None,
        }
    }

    fn anonymous() -> Self {
        Self {
            loading: false,
            is_authenticated: false,
            user: None,
        }
    }

    fn from_session(session: Session) -> Self {
        Self {
            loading: false,
            is_authenticated: session.is_authenticated(),
            user: session.user,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Loading
        } else if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }
}

/// Coarse session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Authenticated,
    Anonymous,
}

/// Authenticated-session facade
pub struct SessionController {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    state: Arc<watch::Sender<AuthState>>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionController {
    /// Create a controller in the `Loading` phase. Call
    /// [`initialize`](Self::initialize) to read the store.
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(AuthState::loading());
        Self {
            api,
            store,
            state: Arc::new(state),
            listener: Mutex::new(None),
        }
    }

    /// Read the stored session once and start following store changes.
    ///
    /// No network call is made: a stored session is trusted until a request
    /// is rejected. Calling this again is a no-op. Must run inside a Tokio
    /// runtime.
    pub fn initialize(&self) {
        let mut listener = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        if listener.is_some() {
            return;
        }

        // Subscribe before reading so a concurrent change is not missed
        let events = self.store.subscribe();
        let session = self.store.read();
        log::debug!(
            "Session initialized (authenticated: {})",
            session.is_authenticated()
        );
        self.state.send_replace(AuthState::from_session(session));

        *listener = Some(tokio::spawn(follow_store(
            events,
            self.store.clone(),
            Arc::downgrade(&self.state),
        )));
    }

    /// Current state snapshot
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.borrow().phase()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    /// Name to greet the user with
    pub fn username(&self) -> Option<String> {
        self.state
            .borrow()
            .user
            .as_ref()
            .and_then(UserProfile::display_name)
    }

    /// Watch state changes
    #[allow(dead_code)]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Sign in.
    ///
    /// The login call persists the token; the controller adopts the returned
    /// identity. On failure the in-memory session is dropped and the error is
    /// returned as is.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<UserProfile>> {
        match self.api.login(email, password).await {
            Ok(response) => {
                let user = response.user.or_else(|| self.store.read().user);
                self.state.send_replace(AuthState {
                    loading: false,
                    is_authenticated: true,
                    user: user.clone(),
                });
                Ok(user)
            }
            Err(err) => {
                self.state.send_replace(AuthState::anonymous());
                Err(err)
            }
        }
    }

    /// Create an account. Does not sign in or touch the session.
    pub async fn register(&self, request: &SignupRequest) -> Result<()> {
        self.api.signup(request).await
    }

    pub async fn check_username(&self, username: &str) -> Result<UsernameAvailability> {
        self.api.check_username(username).await
    }

    /// Sign out locally. Never fails.
    pub fn logout(&self) {
        self.store.clear();
        self.state.send_replace(AuthState::anonymous());
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        let listener = self.listener.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = listener.take() {
            handle.abort();
        }
    }
}

/// Mirror store notifications into the controller's state until the
/// controller goes away.
async fn follow_store(
    mut events: broadcast::Receiver<SessionEvent>,
    store: Arc<dyn SessionStore>,
    state: std::sync::Weak<watch::Sender<AuthState>>,
) {
    loop {
        let next = match events.recv().await {
            Ok(SessionEvent::Saved(session)) => AuthState::from_session(session),
            Ok(SessionEvent::Cleared) => AuthState::anonymous(),
            Err(RecvError::Lagged(skipped)) => {
                log::debug!("Missed {} session events, re-reading store", skipped);
                AuthState::from_session(store.read())
            }
            Err(RecvError::Closed) => break,
        };

        let Some(sender) = state.upgrade() else {
            break;
        };
        if !next.is_authenticated {
            log::debug!("Session cleared");
        }
        sender.send_replace(next);
    }
}

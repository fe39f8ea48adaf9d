//! Command execution context
//!
//! Provides a unified context for command execution, eliminating boilerplate
//! for config loading, session wiring, and client initialization.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{RequestDispatcher, TaskDeskClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{FileSessionStore, SessionController, SessionStore, UserProfile};

/// Context for command execution containing config, client, and session.
///
/// Building a context never touches the network: the stored session is
/// trusted until the server rejects it.
pub struct CommandContext {
    /// API client (Arc-wrapped so concurrent requests can share it)
    pub client: Arc<TaskDeskClient>,
    /// Session facade, already initialized from the store
    pub session: SessionController,
    /// Resolved output format
    pub format: OutputFormat,
    /// Resolved backend base URL
    pub api_url: String,
    /// Where the session is persisted
    pub session_path: PathBuf,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// This handles:
    /// - Loading config from path (or default location)
    /// - Resolving the API URL and output format
    /// - Opening the session file next to the config file
    /// - Creating the API client with a session-expired notice
    /// - Reading the stored session
    pub async fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?;
        let api_url = config.resolve_api_url(opts.api_url_ref());
        let format = resolve_format(opts, &config);

        let store = FileSessionStore::for_config(opts.config_ref())?;
        let session_path = store.path().to_path_buf();
        let store: Arc<dyn SessionStore> = Arc::new(store);

        log::debug!(
            "Using API {} with session {}",
            api_url,
            session_path.display()
        );

        let dispatcher =
            RequestDispatcher::new(&api_url, store.clone())?.with_invalidation_hook(|| {
                eprintln!(
                    "{} Your session has expired. Run {} to sign in again.",
                    "⚠".yellow(),
                    "taskdesk login".cyan()
                );
            });
        let client = Arc::new(TaskDeskClient::new(dispatcher));

        let session = SessionController::new(client.clone(), store);
        session.initialize();

        Ok(Self {
            client,
            session,
            format,
            api_url,
            session_path,
        })
    }

    /// Fail unless a session is stored. Checked before any network call.
    pub fn require_auth(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(Error::NotAuthenticated)
        }
    }

    /// Server-side id of the signed-in user
    pub fn require_user_id(&self) -> Result<String> {
        self.require_auth()?;
        self.session
            .current_user()
            .as_ref()
            .and_then(UserProfile::user_id)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::Other(
                    "Stored session has no user id. Run `taskdesk login` again.".to_string(),
                )
            })
    }
}

/// Flag or env var > config preference > table
pub fn resolve_format(opts: &GlobalOptions, config: &Config) -> OutputFormat {
    opts.format
        .or_else(|| {
            config
                .preferences
                .format
                .as_deref()
                .and_then(OutputFormat::from_name)
        })
        .unwrap_or_default()
}

//! Error types for the TaskDesk CLI

use thiserror::Error;

/// Result type alias for TaskDesk operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not logged in. Run `taskdesk login` to sign in.")]
    NotAuthenticated,

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}

/// Normalized API failure.
///
/// Every variant renders as the single message chosen by the request
/// dispatcher; the underlying transport error never reaches callers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP 401. The local session has already been cleared.
    #[error("{0}")]
    SessionExpired(String),

    /// Any other non-success status below 500
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// HTTP 5xx
    #[error("{message}")]
    Server { status: u16, message: String },

    /// No response was received
    #[error("{0}")]
    Transport(String),

    /// A response arrived but could not be decoded
    #[error("{0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::SessionExpired(_) => Some(401),
            ApiError::Rejected { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Transport(_) | ApiError::InvalidResponse(_) => None,
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::{LoginResponse, SignupRequest, UsernameAvailability};
use crate::error::Result;

/// Authentication operations for the Task Manager API
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account. Does not sign in.
    async fn signup(&self, request: &SignupRequest) -> Result<()>;

    /// Ask whether a username is still free
    async fn check_username(&self, username: &str) -> Result<UsernameAvailability>;

    /// Exchange credentials for a bearer token.
    ///
    /// On success the token and identity payload are already persisted to
    /// the session store when this returns.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;
}

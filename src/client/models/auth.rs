//! Authentication models

use serde::{Deserialize, Serialize};

use crate::session::UserProfile;

/// Body of `POST /api/auth/signup`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignupRequest {
    /// Build a signup request, deriving a username from the full name when
    /// none is given.
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> Self {
        let first_name = first_name.trim().to_string();
        let last_name = last_name.trim().to_string();

        let username = match username.map(str::trim).filter(|u| !u.is_empty()) {
            Some(username) => username.to_string(),
            None => derive_username(&first_name, &last_name),
        };

        Self {
            username,
            email: email.trim().to_string(),
            password: password.to_string(),
            first_name,
            last_name,
        }
    }
}

/// `"Ada Lovelace"` → `"ada_lovelace"`. Characters outside `[a-z0-9_-]` are
/// dropped after lowercasing.
pub fn derive_username(first_name: &str, last_name: &str) -> String {
    let full = format!("{} {}", first_name.trim(), last_name.trim());

    full.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Outcome of a successful login.
///
/// By the time this is returned the token and identity have been persisted.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Identity payload (`data` of the login envelope)
    pub user: Option<UserProfile>,
}

/// `data` of `GET /api/auth/check-username`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameAvailability {
    pub available: bool,
}

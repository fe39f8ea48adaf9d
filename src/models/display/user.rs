//! Session and account display models

use serde::Serialize;
use tabled::Tabled;

use super::common::or_dash;
use crate::session::{AuthState, UserProfile};

/// Signed-in identity for `whoami`
#[derive(Debug, Clone, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDisplay {
    #[tabled(rename = "Signed in")]
    pub authenticated: bool,

    #[tabled(rename = "User ID")]
    pub user_id: String,

    #[tabled(rename = "Username")]
    pub username: String,

    #[tabled(rename = "Name")]
    pub name: String,

    #[tabled(rename = "Email")]
    pub email: String,

    #[tabled(rename = "API")]
    pub api_url: String,
}

impl SessionDisplay {
    pub fn new(state: &AuthState, api_url: &str) -> Self {
        let user = state.user.as_ref().filter(|_| state.is_authenticated);
        Self {
            authenticated: state.is_authenticated,
            user_id: or_dash(user.and_then(UserProfile::user_id)),
            username: or_dash(user.and_then(UserProfile::username)),
            name: or_dash(user.and_then(UserProfile::display_name).as_deref()),
            email: or_dash(user.and_then(UserProfile::email)),
            api_url: api_url.to_string(),
        }
    }
}

/// Result of `check-username`
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct UsernameDisplay {
    #[tabled(rename = "USERNAME")]
    pub username: String,

    #[tabled(rename = "AVAILABLE")]
    pub available: bool,
}

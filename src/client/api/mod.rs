//! API trait definitions split by responsibility
//!
//! - [`AuthApi`] - Signup, login and username checks
//! - [`TaskApi`] - Task CRUD and filtered listing
//!
//! [`TaskDeskClient`](super::TaskDeskClient) implements both.

mod auth;
mod tasks;

pub use auth::AuthApi;
pub use tasks::TaskApi;

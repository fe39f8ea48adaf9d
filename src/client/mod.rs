//! Task Manager API client

pub mod api;
pub mod dispatcher;
pub mod models;
pub mod taskdesk;

pub use api::{AuthApi, TaskApi};
pub use dispatcher::RequestDispatcher;
pub use taskdesk::TaskDeskClient;

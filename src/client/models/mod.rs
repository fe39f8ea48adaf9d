//! Task Manager API data models
//!
//! Request and response types for the auth and task endpoints.

mod auth;
mod task;

pub use auth::{LoginRequest, LoginResponse, SignupRequest, UsernameAvailability};
pub use task::{Task, TaskFilterParams, TaskRequest, TaskStatus};

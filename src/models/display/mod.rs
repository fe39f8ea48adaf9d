//! Display model implementations for table and JSON output
//!
//! Display models transform API response types into CLI-friendly formats
//! with appropriate column names and serialization.

mod common;
mod task;
mod user;

pub use task::{TaskDetailDisplay, TaskDisplay};
pub use user::{SessionDisplay, UsernameDisplay};

//! Display models for CLI output

pub mod display;

pub use display::{SessionDisplay, TaskDetailDisplay, TaskDisplay, UsernameDisplay};

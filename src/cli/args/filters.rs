//! Filter argument types for CLI commands

use clap::Args;

use crate::client::models::{TaskFilterParams, TaskStatus};

/// Filter arguments for the task list command
#[derive(Args, Debug, Default, Clone)]
pub struct TaskFilterArgs {
    /// Filter by status (pending, in-progress, completed)
    #[arg(long, short = 's', value_enum, hide_possible_values = true)]
    pub status: Option<TaskStatus>,

    /// Filter by priority (low, medium, high)
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Only tasks past their due date
    #[arg(long)]
    pub overdue: bool,

    /// Only tasks created by or assigned to you
    #[arg(long, short = 'm', conflicts_with_all = ["status", "priority", "overdue"])]
    pub mine: bool,

    /// Maximum results to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

impl TaskFilterArgs {
    /// Convert CLI args to server-side filter params
    pub fn to_params(&self) -> TaskFilterParams {
        TaskFilterParams {
            status: self.status,
            priority: self
                .priority
                .as_deref()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty()),
            overdue: self.overdue,
        }
    }
}

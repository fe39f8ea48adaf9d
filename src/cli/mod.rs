//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

use crate::client::models::TaskStatus;

pub mod args;
pub mod auth;
pub mod completions;
pub mod config;
pub mod context;
pub mod task;
pub mod whoami;

pub use args::{OutputFormat, TaskFilterArgs};

/// TaskDesk - command-line client for the Task Manager service
#[derive(Parser, Debug)]
#[command(name = "taskdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "TASKDESK_FORMAT",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: Option<OutputFormat>,

    /// Override config file location
    #[arg(long, global = true, env = "TASKDESK_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the Task Manager API base URL
    #[arg(long, global = true, env = "TASKDESK_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "TASKDESK_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        /// Account email (prompted if omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,

        /// Account password (prompted if omitted)
        #[arg(long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Create a new account
    #[command(after_help = "EXAMPLES:\n  \
            taskdesk register --first-name Ada --last-name Lovelace --email ada@example.com\n  \
            taskdesk register --first-name Ada --last-name Lovelace --email ada@example.com --username ada")]
    Register {
        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,

        /// Account email
        #[arg(long, short = 'e')]
        email: String,

        /// Username (derived from your name if omitted)
        #[arg(long, short = 'u')]
        username: Option<String>,

        /// Password (prompted if omitted)
        #[arg(long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Check whether a username is still available
    CheckUsername {
        /// Username to check
        username: String,
    },

    /// Show who you are signed in as
    Whoami,

    /// Display version information
    Version,

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommands),

    /// View and edit CLI configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   taskdesk completion bash > /etc/bash_completion.d/taskdesk
  zsh:    taskdesk completion zsh > \"${fpath[1]}/_taskdesk\"
  fish:   taskdesk completion fish > ~/.config/fish/completions/taskdesk.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Task management subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks
    #[command(
        visible_alias = "ls",
        after_help = "EXAMPLES:\n  \
            taskdesk task list                          # All visible tasks\n  \
            taskdesk task list --status in-progress     # By status\n  \
            taskdesk task list --priority high --overdue\n  \
            taskdesk task list --mine --format json     # Yours, for scripting"
    )]
    List {
        #[command(flatten)]
        filters: TaskFilterArgs,
    },

    /// Show a single task
    #[command(visible_alias = "g")]
    Get {
        /// Task ID
        id: String,
    },

    /// Create a task
    #[command(after_help = "EXAMPLES:\n  \
            taskdesk task create \"Write report\"\n  \
            taskdesk task create \"Ship release\" --priority high --due 2025-02-01")]
    Create {
        /// Task title
        title: String,

        #[command(flatten)]
        fields: TaskFieldArgs,
    },

    /// Update fields of a task
    #[command(after_help = "EXAMPLES:\n  \
            taskdesk task update abc123 --status completed\n  \
            taskdesk task update abc123 --title \"New title\" --due 2025-03-01")]
    Update {
        /// Task ID
        id: String,

        /// New title
        #[arg(long, short = 't')]
        title: Option<String>,

        #[command(flatten)]
        fields: TaskFieldArgs,
    },

    /// Delete one or more tasks
    #[command(visible_alias = "rm")]
    Delete {
        /// Task IDs
        #[arg(required = true, value_delimiter = ',')]
        ids: Vec<String>,
    },
}

/// Optional task fields shared by create and update
#[derive(clap::Args, Debug, Default, Clone)]
pub struct TaskFieldArgs {
    /// Task description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Status (pending, in-progress, completed)
    #[arg(long, short = 's', value_enum, hide_possible_values = true)]
    pub status: Option<TaskStatus>,

    /// Priority (low, medium, high)
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = task::parse_due_date)]
    pub due: Option<String>,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Set the Task Manager API base URL
    SetUrl {
        /// Base URL, e.g. https://tasks.example.com
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_list_filters() {
        let cli = Cli::try_parse_from([
            "taskdesk",
            "task",
            "list",
            "--status",
            "in-progress",
            "--overdue",
            "-n",
            "5",
        ])
        .unwrap();

        match cli.command {
            Commands::Task(TaskCommands::List { filters }) => {
                assert_eq!(filters.status, Some(TaskStatus::InProgress));
                assert!(filters.overdue);
                assert_eq!(filters.limit, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_mine_conflicts_with_server_filters() {
        let result = Cli::try_parse_from(["taskdesk", "task", "list", "--mine", "--overdue"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_accepts_many_ids() {
        let cli = Cli::try_parse_from(["taskdesk", "task", "delete", "t1", "t2,t3"]).unwrap();
        match cli.command {
            Commands::Task(TaskCommands::Delete { ids }) => {
                assert_eq!(ids, vec!["t1", "t2", "t3"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_due_date_is_validated() {
        let result = Cli::try_parse_from([
            "taskdesk", "task", "create", "Report", "--due", "next week",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "taskdesk",
            "whoami",
            "--format",
            "json",
            "--api-url",
            "http://localhost:5000",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:5000"));
    }
}

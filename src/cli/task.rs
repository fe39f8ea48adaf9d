//! Task commands
//!
//! Every task command needs a stored session and fails before any request
//! is sent when there is none.

use chrono::NaiveDate;
use colored::Colorize;
use futures::future::join_all;
use log::debug;

use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::cli::{TaskFieldArgs, TaskFilterArgs};
use crate::client::TaskApi;
use crate::client::models::{Task, TaskRequest};
use crate::error::{Error, Result};
use crate::models::{TaskDetailDisplay, TaskDisplay};
use crate::output::{Formattable, Record};

/// Clap value parser for `--due`: a calendar date, `YYYY-MM-DD`
pub fn parse_due_date(value: &str) -> std::result::Result<String, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

/// Apply the optional field flags to a request
fn with_fields(request: TaskRequest, fields: &TaskFieldArgs) -> TaskRequest {
    request
        .description(fields.description.as_deref())
        .status(fields.status)
        .priority(fields.priority.as_deref().map(str::to_lowercase).as_deref())
        .due_date(fields.due.as_deref())
}

/// Run the task list command
pub async fn list(opts: &GlobalOptions, filters: &TaskFilterArgs) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    ctx.require_auth()?;

    let tasks = if filters.mine {
        let user_id = ctx.require_user_id()?;
        debug!("Fetching tasks for user {}", user_id);
        ctx.client.list_user_tasks(&user_id).await?
    } else {
        ctx.client.list_tasks(&filters.to_params()).await?
    };

    debug!("Fetched {} tasks", tasks.len());

    let limited: Vec<Task> = match filters.limit {
        Some(limit) => tasks.into_iter().take(limit).collect(),
        None => tasks,
    };

    let display: Vec<TaskDisplay> = limited.iter().map(TaskDisplay::from).collect();
    display.print(ctx.format)
}

/// Run the task get command
pub async fn get(opts: &GlobalOptions, id: &str) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    ctx.require_auth()?;

    let task = ctx.client.get_task(id).await?;
    Record(TaskDetailDisplay::from(task)).print(ctx.format)
}

/// Run the task create command. The signed-in user becomes the creator.
pub async fn create(opts: &GlobalOptions, title: &str, fields: &TaskFieldArgs) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    let user_id = ctx.require_user_id()?;

    let request = with_fields(TaskRequest::default().title(Some(title)), fields)
        .created_by(Some(&user_id));
    if request.title.is_none() {
        return Err(Error::Other("Task title cannot be empty".to_string()));
    }

    let task = ctx.client.create_task(&request).await?;
    eprintln!("{} Created task {}", "✓".green(), task.id.bold());
    Record(TaskDetailDisplay::from(task)).print(ctx.format)
}

/// Run the task update command. Only the given fields change.
pub async fn update(
    opts: &GlobalOptions,
    id: &str,
    title: Option<&str>,
    fields: &TaskFieldArgs,
) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    ctx.require_auth()?;

    let request = with_fields(TaskRequest::default().title(title), fields);
    if request.is_empty() {
        return Err(Error::Other(
            "Nothing to update. Pass at least one of --title, --description, --status, --priority, --due".to_string(),
        ));
    }

    let task = ctx.client.update_task(id, &request).await?;
    eprintln!("{} Updated task {}", "✓".green(), task.id.bold());
    Record(TaskDetailDisplay::from(task)).print(ctx.format)
}

/// Run the task delete command.
///
/// Deletions run concurrently; each failure is reported once and the command
/// fails if any did.
pub async fn delete(opts: &GlobalOptions, ids: &[String]) -> Result<()> {
    let ctx = CommandContext::new(opts).await?;
    ctx.require_auth()?;

    let results = join_all(ids.iter().map(|id| {
        let client = ctx.client.clone();
        async move { (id, client.delete_task(id).await) }
    }))
    .await;

    let mut failed = 0;
    for (id, result) in &results {
        match result {
            Ok(()) => println!("{} Deleted task {}", "✓".green(), id.bold()),
            Err(err) => {
                failed += 1;
                eprintln!("{} {}: {}", "✗".red(), id.bold(), err);
            }
        }
    }

    if failed > 0 {
        return Err(Error::Other(format!(
            "{} of {} deletions failed",
            failed,
            results.len()
        )));
    }

    Ok(())
}

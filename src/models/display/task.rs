//! Task display models

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tabled::Tabled;

use super::common::{or_dash, person_label};
use crate::client::models::Task;
use crate::output::formatters::{format_date, format_timestamp_local, is_overdue};

/// Task row for list output
#[derive(Debug, Clone, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDisplay {
    #[tabled(rename = "TASK ID")]
    pub id: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "PRIORITY")]
    pub priority: String,

    #[tabled(rename = "DUE")]
    pub due_date: String,

    #[tabled(skip)]
    pub overdue: bool,
}

/// `YYYY-MM-DD`, flagged when past due
fn due_label(task: &Task, today: NaiveDate) -> (String, bool) {
    let date = format_date(task.due_date.as_deref());
    let overdue = is_overdue(task.due_date.as_deref(), task.status.as_deref(), today);
    if overdue {
        (format!("{} (overdue)", date), true)
    } else {
        (date, false)
    }
}

impl TaskDisplay {
    /// Build a row, judging overdue-ness against `today`
    pub fn new(task: &Task, today: NaiveDate) -> Self {
        let (due_date, overdue) = due_label(task, today);
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            status: or_dash(task.status.as_deref()),
            priority: or_dash(task.priority.as_deref()),
            due_date,
            overdue,
        }
    }
}

impl From<&Task> for TaskDisplay {
    fn from(task: &Task) -> Self {
        Self::new(task, Local::now().date_naive())
    }
}

impl From<Task> for TaskDisplay {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

/// Full task view for `task get`, `task create` and `task update`
#[derive(Debug, Clone, Tabled, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailDisplay {
    #[tabled(rename = "ID")]
    pub id: String,

    #[tabled(rename = "Title")]
    pub title: String,

    #[tabled(rename = "Description")]
    pub description: String,

    #[tabled(rename = "Status")]
    pub status: String,

    #[tabled(rename = "Priority")]
    pub priority: String,

    #[tabled(rename = "Due")]
    pub due_date: String,

    #[tabled(rename = "Created by")]
    pub created_by: String,

    #[tabled(rename = "Assigned to")]
    pub assigned_to: String,

    #[tabled(rename = "Created")]
    pub created_at: String,

    #[tabled(rename = "Updated")]
    pub updated_at: String,
}

impl From<&Task> for TaskDetailDisplay {
    fn from(task: &Task) -> Self {
        let (due_date, _) = due_label(task, Local::now().date_naive());

        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: or_dash(task.description.as_deref()),
            status: or_dash(task.status.as_deref()),
            priority: or_dash(task.priority.as_deref()),
            due_date,
            created_by: person_label(task.created_by.as_ref()),
            assigned_to: person_label(task.assigned_to.as_ref()),
            created_at: format_timestamp_local(task.created_at.as_deref()),
            updated_at: format_timestamp_local(task.updated_at.as_deref()),
        }
    }
}

impl From<Task> for TaskDetailDisplay {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(value: serde_json::Value) -> Task {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_task_display_marks_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let t = task(json!({
            "_id": "t1",
            "title": "Write report",
            "status": "pending",
            "dueDate": "2025-02-01"
        }));

        let display = TaskDisplay::new(&t, today);
        assert_eq!(display.id, "t1");
        assert_eq!(display.priority, "--");
        assert!(display.overdue);
        assert_eq!(display.due_date, "2025-02-01 (overdue)");
    }

    #[test]
    fn test_completed_task_is_never_overdue() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let t = task(json!({
            "_id": "t1",
            "title": "Done",
            "status": "completed",
            "dueDate": "2025-02-01"
        }));

        let display = TaskDisplay::new(&t, today);
        assert!(!display.overdue);
        assert_eq!(display.due_date, "2025-02-01");
    }

    #[test]
    fn test_task_display_json_fields() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let t = task(json!({ "_id": "t1", "title": "No date" }));

        let value = serde_json::to_value(TaskDisplay::new(&t, today)).unwrap();
        assert_eq!(value["id"], "t1");
        assert_eq!(value["dueDate"], "--");
        assert_eq!(value["overdue"], false);
    }

    #[test]
    fn test_task_detail_display() {
        let t = task(json!({
            "_id": "t1",
            "title": "Write report",
            "description": "Quarterly numbers",
            "createdBy": { "_id": "u1", "username": "alice" },
            "assignedTo": "u2",
            "createdAt": "2025-01-15T12:00:00Z"
        }));

        let display = TaskDetailDisplay::from(&t);
        assert_eq!(display.description, "Quarterly numbers");
        assert_eq!(display.created_by, "alice");
        assert_eq!(display.assigned_to, "u2");
        assert_eq!(display.due_date, "--");
        assert!(display.created_at.contains("2025"));
        assert_eq!(display.updated_at, "N/A");
    }
}

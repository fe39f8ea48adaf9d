//! Task models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Task status values understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TaskStatus {
    /// Not started
    Pending,
    /// Being worked on
    InProgress,
    /// Done
    Completed,
}

impl TaskStatus {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task ID
    #[serde(rename = "_id")]
    pub id: String,

    /// Task title
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Status as sent by the server (pending, in-progress, completed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// Due date, ISO 8601
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Creator: an id, or a populated user object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Value>,

    /// Assignee: an id, or a populated user object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of `POST /api/tasks` and `PUT /api/tasks/:id`.
///
/// Only fields that are set are sent, so an update touches nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// `YYYY-MM-DD` or full ISO 8601
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Required by the backend on create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl TaskRequest {
    /// Set the title; surrounding whitespace is trimmed and blank is unset
    pub fn title(mut self, title: Option<&str>) -> Self {
        self.title = non_blank(title);
        self
    }

    pub fn description(mut self, description: Option<&str>) -> Self {
        self.description = non_blank(description);
        self
    }

    pub fn status(mut self, status: Option<TaskStatus>) -> Self {
        self.status = status.map(|s| s.as_str().to_string());
        self
    }

    pub fn priority(mut self, priority: Option<&str>) -> Self {
        self.priority = non_blank(priority);
        self
    }

    pub fn due_date(mut self, due_date: Option<&str>) -> Self {
        self.due_date = non_blank(due_date);
        self
    }

    pub fn created_by(mut self, user_id: Option<&str>) -> Self {
        self.created_by = non_blank(user_id);
        self
    }

    /// True when no field would be sent
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Server-side filters for `GET /api/tasks`
#[derive(Debug, Clone, Default)]
pub struct TaskFilterParams {
    pub status: Option<TaskStatus>,
    pub priority: Option<String>,
    pub overdue: bool,
}

impl TaskFilterParams {
    /// Query parameters; unset filters are omitted
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority.as_deref().filter(|p| !p.is_empty()) {
            query.push(("priority", priority.to_string()));
        }
        if self.overdue {
            query.push(("overdue", "true".to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_deserializes_mongo_id() {
        let task: Task = serde_json::from_value(json!({
            "_id": "t1",
            "title": "Write report",
            "status": "in-progress",
            "dueDate": "2025-01-15T00:00:00.000Z",
            "createdBy": { "_id": "u1", "username": "alice" },
            "__v": 0
        }))
        .unwrap();

        assert_eq!(task.id, "t1");
        assert_eq!(task.status.as_deref(), Some("in-progress"));
        assert_eq!(task.due_date.as_deref(), Some("2025-01-15T00:00:00.000Z"));
        assert!(task.created_by.is_some());
        assert!(task.priority.is_none());
    }

    #[test]
    fn test_task_request_omits_unset_fields() {
        let req = TaskRequest::default()
            .title(Some("  Ship it "))
            .description(Some("   "))
            .status(Some(TaskStatus::InProgress))
            .created_by(Some("u1"));

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "title": "Ship it", "status": "in-progress", "createdBy": "u1" })
        );
    }

    #[test]
    fn test_task_request_is_empty() {
        assert!(TaskRequest::default().is_empty());
        assert!(TaskRequest::default().title(Some(" ")).is_empty());
        assert!(!TaskRequest::default().priority(Some("high")).is_empty());
    }

    #[test]
    fn test_filter_query() {
        assert!(TaskFilterParams::default().to_query().is_empty());

        let filters = TaskFilterParams {
            status: Some(TaskStatus::Completed),
            priority: Some("high".to_string()),
            overdue: true,
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("status", "completed".to_string()),
                ("priority", "high".to_string()),
                ("overdue", "true".to_string()),
            ]
        );
    }
}

//! Task API trait

use async_trait::async_trait;

use crate::client::models::{Task, TaskFilterParams, TaskRequest};
use crate::error::Result;

/// Task operations for the Task Manager API
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// List tasks visible to the caller, narrowed by server-side filters
    async fn list_tasks(&self, filters: &TaskFilterParams) -> Result<Vec<Task>>;

    /// Tasks created by or assigned to a user.
    ///
    /// An empty user id yields an empty list without calling the server.
    async fn list_user_tasks(&self, user_id: &str) -> Result<Vec<Task>>;

    async fn get_task(&self, id: &str) -> Result<Task>;

    async fn create_task(&self, request: &TaskRequest) -> Result<Task>;

    /// Update only the fields set in `request`
    async fn update_task(&self, id: &str, request: &TaskRequest) -> Result<Task>;

    async fn delete_task(&self, id: &str) -> Result<()>;
}

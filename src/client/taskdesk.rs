//! Task Manager API client implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use super::dispatcher::{RequestDispatcher, Unwrapped};
use super::models::{
    LoginRequest, LoginResponse, SignupRequest, Task, TaskFilterParams, TaskRequest,
    UsernameAvailability,
};
use super::{AuthApi, TaskApi};
use crate::error::{ApiError, Result};
use crate::session::{SessionStore, UserProfile};

const SIGNUP_PATH: &str = "/api/auth/signup";
const CHECK_USERNAME_PATH: &str = "/api/auth/check-username";
const LOGIN_PATH: &str = "/api/auth/login";
const TASKS_PATH: &str = "/api/tasks";

/// Task Manager API client.
///
/// A thin layer of endpoint functions; all HTTP goes through the
/// [`RequestDispatcher`].
#[derive(Debug)]
pub struct TaskDeskClient {
    dispatcher: RequestDispatcher,
}

impl TaskDeskClient {
    pub fn new(dispatcher: RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Client for `base_url` with no invalidation hook
    #[allow(dead_code)]
    pub fn with_store(base_url: &str, store: Arc<dyn SessionStore>) -> Result<Self> {
        Ok(Self::new(RequestDispatcher::new(base_url, store)?))
    }

    fn task_path(id: &str) -> String {
        format!("{}/{}", TASKS_PATH, urlencoding::encode(id))
    }
}

#[async_trait]
impl AuthApi for TaskDeskClient {
    async fn signup(&self, request: &SignupRequest) -> Result<()> {
        let _: Value = self.dispatcher.post(SIGNUP_PATH, request).await?;
        Ok(())
    }

    async fn check_username(&self, username: &str) -> Result<UsernameAvailability> {
        self.dispatcher
            .get(CHECK_USERNAME_PATH, &[("username", username.to_string())])
            .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest { email, password };
        let reply: Unwrapped<Option<UserProfile>> = self
            .dispatcher
            .execute(Method::POST, LOGIN_PATH, &[], Some(&body))
            .await?;

        let token = reply.token.ok_or_else(|| {
            ApiError::InvalidResponse("Login response did not include a token".to_string())
        })?;

        self.dispatcher
            .store()
            .save(&token, reply.data.as_ref())?;

        Ok(LoginResponse { user: reply.data })
    }
}

#[async_trait]
impl TaskApi for TaskDeskClient {
    async fn list_tasks(&self, filters: &TaskFilterParams) -> Result<Vec<Task>> {
        self.dispatcher.get(TASKS_PATH, &filters.to_query()).await
    }

    async fn list_user_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        if user_id.trim().is_empty() {
            return Ok(Vec::new());
        }
        let path = format!("{}/user/{}", TASKS_PATH, urlencoding::encode(user_id));
        self.dispatcher.get(&path, &[]).await
    }

    async fn get_task(&self, id: &str) -> Result<Task> {
        self.dispatcher.get(&Self::task_path(id), &[]).await
    }

    async fn create_task(&self, request: &TaskRequest) -> Result<Task> {
        self.dispatcher.post(TASKS_PATH, request).await
    }

    async fn update_task(&self, id: &str, request: &TaskRequest) -> Result<Task> {
        self.dispatcher.put(&Self::task_path(id), request).await
    }

    async fn delete_task(&self, id: &str) -> Result<()> {
        let _: Value = self.dispatcher.delete(&Self::task_path(id)).await?;
        Ok(())
    }
}

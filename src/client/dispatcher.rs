//! Request dispatcher
//!
//! Every API call goes through [`RequestDispatcher`]. It owns three concerns:
//!
//! - attaching the bearer token read from the [`SessionStore`] on each call
//! - unwrapping the server's `{status, message, data, token?}` envelope
//! - turning any failure into a single-message [`ApiError`], clearing the
//!   session and firing the invalidation hook when the server answers 401

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::session::SessionStore;

/// Message used when nothing better is available
pub const FALLBACK_MESSAGE: &str = "Network Error";

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Callback fired after a 401 has cleared the session.
///
/// The dispatcher does not know how the caller gets back to a login prompt;
/// the hook decides.
pub type InvalidationHook = Arc<dyn Fn() + Send + Sync>;

/// Successful call with the envelope stripped
#[derive(Debug, Clone)]
pub struct Unwrapped<T> {
    /// The envelope's `data`
    pub data: T,
    /// Top-level `token`, only sent by the login endpoint
    pub token: Option<String>,
}

/// Server response wrapper
#[derive(Debug, serde::Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    token: Option<String>,
}

/// Single choke point for HTTP calls to the Task Manager backend
pub struct RequestDispatcher {
    http: HttpClient,
    base_url: String,
    store: Arc<dyn SessionStore>,
    on_invalidated: Option<InvalidationHook>,
}

impl fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("base_url", &self.base_url)
            .field("on_invalidated", &self.on_invalidated.is_some())
            .finish()
    }
}

impl RequestDispatcher {
    /// Create a dispatcher for `base_url` backed by `store`
    pub fn new(base_url: impl Into<String>, store: Arc<dyn SessionStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .user_agent(concat!("taskdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(transport_message(&e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            on_invalidated: None,
        })
    }

    /// Register the callback fired after a 401 clears the session
    pub fn with_invalidation_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_invalidated = Some(Arc::new(hook));
        self
    }

    /// The store this dispatcher reads credentials from
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// `GET` returning the envelope's `data`
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let reply = self
            .execute::<T, ()>(Method::GET, path, query, None)
            .await?;
        Ok(reply.data)
    }

    /// `POST` returning the envelope's `data`
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let reply = self
            .execute::<T, B>(Method::POST, path, &[], Some(body))
            .await?;
        Ok(reply.data)
    }

    /// `PUT` returning the envelope's `data`
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let reply = self
            .execute::<T, B>(Method::PUT, path, &[], Some(body))
            .await?;
        Ok(reply.data)
    }

    /// `DELETE` returning the envelope's `data`
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let reply = self
            .execute::<T, ()>(Method::DELETE, path, &[], None)
            .await?;
        Ok(reply.data)
    }

    /// Send a request and unwrap the envelope, keeping the top-level token.
    pub async fn execute<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Unwrapped<T>> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        // Always re-read: a login or a 401 elsewhere may have changed it
        if let Some(token) = self.store.read().token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::debug!("API error: {} {} failed: {:?}", method, url, e);
                return Err(self.fail(None, None, Some(transport_message(&e))).into());
            }
        };

        let status = response.status();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("API error: reading body of {} {}: {:?}", method, url, e);
                return Err(self
                    .fail(Some(status), None, Some(transport_message(&e)))
                    .into());
            }
        };

        if !status.is_success() {
            let body = serde_json::from_slice::<Value>(&bytes).ok();
            log::debug!(
                "API error: {} {} returned {}: {}",
                method,
                url,
                status,
                String::from_utf8_lossy(&bytes)
            );
            let transport = format!("Request failed with status code {}", status.as_u16());
            return Err(self.fail(Some(status), body.as_ref(), Some(transport)).into());
        }

        match unwrap_envelope(&bytes) {
            Ok(reply) => Ok(reply),
            Err(decode_error) => {
                log::debug!(
                    "API error: {} {} sent an unreadable body: {}",
                    method,
                    url,
                    decode_error
                );
                let message = select_message(None, Some(decode_error.as_str()));
                Err(ApiError::InvalidResponse(message).into())
            }
        }
    }

    /// Normalize a failed exchange. A 401 invalidates the session first.
    fn fail(
        &self,
        status: Option<StatusCode>,
        body: Option<&Value>,
        transport: Option<String>,
    ) -> ApiError {
        if status == Some(StatusCode::UNAUTHORIZED) {
            self.invalidate_session();
        }

        let message = select_message(body, transport.as_deref());
        match status {
            None => ApiError::Transport(message),
            Some(StatusCode::UNAUTHORIZED) => ApiError::SessionExpired(message),
            Some(status) if status.is_server_error() => ApiError::Server {
                status: status.as_u16(),
                message,
            },
            Some(status) if status.is_success() => ApiError::Transport(message),
            Some(status) => ApiError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    fn invalidate_session(&self) {
        log::info!("Server rejected the session credential; signing out");
        self.store.clear();
        if let Some(hook) = &self.on_invalidated {
            hook();
        }
    }
}

/// Decode a success body into its `data` and `token`.
fn unwrap_envelope<T: DeserializeOwned>(bytes: &[u8]) -> std::result::Result<Unwrapped<T>, String> {
    // No content is an envelope with null data
    let envelope: Envelope = if bytes.iter().all(u8::is_ascii_whitespace) {
        Envelope {
            status: None,
            message: None,
            data: Value::Null,
            token: None,
        }
    } else {
        serde_json::from_slice(bytes).map_err(|e| format!("Invalid response body: {}", e))?
    };

    log::debug!(
        "Envelope status={:?} message={:?}",
        envelope.status,
        envelope.message
    );

    let data = serde_json::from_value::<T>(envelope.data)
        .map_err(|e| format!("Unexpected response data: {}", e))?;

    Ok(Unwrapped {
        data,
        token: envelope.token.filter(|t| !t.is_empty()),
    })
}

/// Pick the message shown to the user, first match wins:
/// body `message`, body `error`, transport message, then [`FALLBACK_MESSAGE`].
pub fn select_message(body: Option<&Value>, transport: Option<&str>) -> String {
    let from_body = |key: &str| {
        body.and_then(|b| b.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    };

    from_body("message")
        .or_else(|| from_body("error"))
        .or_else(|| transport.filter(|s| !s.is_empty()))
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string()
}

/// Human-readable text for a `reqwest` failure
fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timed out".to_string()
    } else if err.is_connect() {
        "Failed to connect to API".to_string()
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::session::{MemorySessionStore, Session, UserProfile};
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn alice() -> UserProfile {
        serde_json::from_value(json!({ "userId": "u1", "username": "alice" })).unwrap()
    }

    fn dispatcher(url: &str, store: Arc<MemorySessionStore>) -> RequestDispatcher {
        RequestDispatcher::new(url, store).unwrap()
    }

    fn api_error(err: Error) -> ApiError {
        match err {
            Error::Api(api) => api,
            other => panic!("Expected Error::Api, got {:?}", other),
        }
    }

    #[test]
    fn test_select_message_prefers_body_message() {
        let body = json!({ "message": "A", "error": "B" });
        assert_eq!(select_message(Some(&body), Some("timeout")), "A");
    }

    #[test]
    fn test_select_message_falls_back_to_body_error() {
        let body = json!({ "error": "B" });
        assert_eq!(select_message(Some(&body), Some("timeout")), "B");
    }

    #[test]
    fn test_select_message_falls_back_to_transport() {
        let body = json!({ "status": "error" });
        assert_eq!(select_message(Some(&body), Some("timeout")), "timeout");
        assert_eq!(select_message(None, Some("timeout")), "timeout");
    }

    #[test]
    fn test_select_message_generic_fallback() {
        assert_eq!(select_message(None, None), "Network Error");
        assert_eq!(select_message(Some(&json!({ "message": "" })), Some("")), "Network Error");
        // Non-string messages are ignored
        assert_eq!(select_message(Some(&json!({ "message": 42 })), None), "Network Error");
    }

    #[tokio::test]
    async fn test_attaches_stored_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tasks")
            .match_header("authorization", "Bearer T1")
            .with_status(200)
            .with_body(r#"{"status":"success","message":"ok","data":[]}"#)
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::with_session("T1", None));
        let tasks: Vec<Value> = dispatcher(&server.url(), store)
            .get("/api/tasks", &[])
            .await
            .unwrap();

        assert!(tasks.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_token_means_no_authorization_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tasks")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let _: Vec<Value> = dispatcher(&server.url(), store)
            .get("/api/tasks", &[])
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_is_reread_on_every_call() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/api/tasks")
            .match_header("authorization", "Bearer T1")
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/tasks")
            .match_header("authorization", "Bearer T2")
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::with_session("T1", None));
        let dispatcher = dispatcher(&server.url(), store.clone());

        let _: Vec<Value> = dispatcher.get("/api/tasks", &[]).await.unwrap();
        store.save("T2", None).unwrap();
        let _: Vec<Value> = dispatcher.get("/api/tasks", &[]).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_unwraps_data_and_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .match_body(Matcher::Json(json!({ "email": "a@x.io", "password": "pw" })))
            .with_status(200)
            .with_body(
                r#"{"status":"ok","message":"Logged in","data":{"userId":"u1","username":"alice"},"token":"T1"}"#,
            )
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let reply: Unwrapped<UserProfile> = dispatcher(&server.url(), store)
            .execute(
                Method::POST,
                "/api/auth/login",
                &[],
                Some(&json!({ "email": "a@x.io", "password": "pw" })),
            )
            .await
            .unwrap();

        assert_eq!(reply.data, alice());
        assert_eq!(reply.token.as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/api/tasks/t1")
            .with_status(204)
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let result: Result<()> = dispatcher(&server.url(), store).delete("/api/tasks/t1").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unauthorized_clears_store_and_fires_hook() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tasks")
            .with_status(401)
            .with_body(r#"{"status":"error","message":"Token expired"}"#)
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::with_session("T1", Some(alice())));
        let fired = Arc::new(AtomicUsize::new(0));
        let hook_store = store.clone();
        let hook_fired = fired.clone();

        let dispatcher = dispatcher(&server.url(), store.clone()).with_invalidation_hook(move || {
            // The store is already empty when the hook runs
            assert_eq!(hook_store.read(), Session::default());
            hook_fired.fetch_add(1, Ordering::SeqCst);
        });

        let err = dispatcher
            .get::<Vec<Value>>("/api/tasks", &[])
            .await
            .unwrap_err();

        let err = api_error(err);
        assert!(matches!(err, ApiError::SessionExpired(_)));
        assert_eq!(err.to_string(), "Token expired");
        assert_eq!(store.read(), Session::default());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_on_auth_endpoint_also_clears() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/auth/login")
            .with_status(401)
            .with_body(r#"{"error":"Invalid credentials"}"#)
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::with_session("OLD", Some(alice())));
        let err = dispatcher(&server.url(), store.clone())
            .post::<Value, _>("/api/auth/login", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(store.read(), Session::default());
    }

    #[tokio::test]
    async fn test_other_failures_leave_store_untouched() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/api/tasks/t1")
            .with_status(403)
            .with_body(r#"{"message":"Not your task"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/tasks")
            .with_status(500)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::with_session("T1", Some(alice())));
        let before = store.read();
        let dispatcher = dispatcher(&server.url(), store.clone());

        let err = api_error(
            dispatcher
                .put::<Value, _>("/api/tasks/t1", &json!({ "title": "x" }))
                .await
                .unwrap_err(),
        );
        assert_eq!(err.to_string(), "Not your task");
        assert_eq!(err.status(), Some(403));

        let err = api_error(
            dispatcher
                .get::<Value>("/api/tasks", &[])
                .await
                .unwrap_err(),
        );
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
        assert_eq!(err.to_string(), "Request failed with status code 500");

        assert_eq!(store.read(), before);
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/tasks/t1")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::with_session("T1", None));
        let err = api_error(
            dispatcher(&server.url(), store.clone())
                .get::<Value>("/api/tasks/t1", &[])
                .await
                .unwrap_err(),
        );

        assert!(matches!(err, ApiError::InvalidResponse(_)));
        assert!(err.to_string().starts_with("Invalid response body"));
        assert_eq!(store.read().token.as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        // Bind then drop a listener to get a port nobody is serving
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let store = Arc::new(MemorySessionStore::with_session("T1", None));
        let err = api_error(
            dispatcher(&url, store.clone())
                .get::<Value>("/api/tasks", &[])
                .await
                .unwrap_err(),
        );

        assert!(matches!(err, ApiError::Transport(_)));
        assert!(!err.to_string().is_empty());
        assert_eq!(store.read().token.as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_query_parameters_are_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tasks")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("status".into(), "in-progress".into()),
                Matcher::UrlEncoded("overdue".into(), "true".into()),
            ]))
            .with_body(r#"{"data":[]}"#)
            .create_async()
            .await;

        let store = Arc::new(MemorySessionStore::new());
        let _: Vec<Value> = dispatcher(&server.url(), store)
            .get(
                "/api/tasks",
                &[
                    ("status", "in-progress".to_string()),
                    ("overdue", "true".to_string()),
                ],
            )
            .await
            .unwrap();

        mock.assert_async().await;
    }
}

//! Scriptable in-process stand-in for the sync backend
//!
//! The mock listens on an ephemeral localhost port, records every request
//! and answers from a list of scripted responses. Anything not scripted gets
//! `200 {}`.

use crate::builders::{PlanBuilder, apply_result};
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// A request as received by [`MockBackend`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// `key=value` pairs in wire order, not percent-decoded
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect()
    }

    /// Value of query parameter `key`
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Body parsed as JSON
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }
}

#[derive(Debug, Clone)]
struct ScriptedResponse {
    method: Method,
    path: String,
    query_contains: Option<String>,
    status: u16,
    body: String,
}

impl ScriptedResponse {
    fn matches(&self, method: &Method, path: &str, query: Option<&str>) -> bool {
        self.method == *method
            && self.path == path
            && self
                .query_contains
                .as_deref()
                .is_none_or(|needle| query.unwrap_or_default().contains(needle))
    }
}

#[derive(Default)]
struct Shared {
    scripted: Mutex<Vec<ScriptedResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Mock sync backend served by axum
///
/// # Examples
///
/// ```rust,no_run
/// use confsync_test_utils::MockBackend;
///
/// # async fn example() {
/// let backend = MockBackend::start().await;
/// backend.respond("POST", "/extract_configs", 500, "boom");
///
/// // point the client at backend.base_url() ...
///
/// assert_eq!(backend.requests().len(), 0);
/// # }
/// ```
pub struct MockBackend {
    base_url: String,
    shared: Arc<Shared>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Bind to `127.0.0.1:0` and start serving
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock backend");
        let addr = listener
            .local_addr()
            .expect("mock backend has no local address");

        let shared = Arc::new(Shared::default());
        let app = Router::new().fallback(record).with_state(Arc::clone(&shared));

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            shared,
            server,
        }
    }

    /// Start a backend that answers planning with a small plan and apply
    /// with `apply_complete: true`
    pub async fn start_successful() -> Self {
        let backend = Self::start().await;
        backend.respond_json(
            "POST",
            "/migrate_settings_2_0",
            200,
            &PlanBuilder::sample().build(),
        );
        backend.respond_json("POST", "/terraform_apply_all", 200, &apply_result(Some(true)));
        backend
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Script the answer for `method path`; later scripts win
    pub fn respond(&self, method: &str, path: &str, status: u16, body: &str) {
        self.push(method, path, None, status, body.to_string());
    }

    /// Script a JSON answer for `method path`
    pub fn respond_json(&self, method: &str, path: &str, status: u16, body: &Value) {
        self.push(method, path, None, status, body.to_string());
    }

    /// Script an answer only for requests whose query string contains `query`
    pub fn respond_when_query(
        &self,
        method: &str,
        path: &str,
        query: &str,
        status: u16,
        body: &str,
    ) {
        self.push(method, path, Some(query.to_string()), status, body.to_string());
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared
            .requests
            .lock()
            .expect("mock backend lock poisoned")
            .clone()
    }

    /// Paths of the requests received so far, in arrival order
    pub fn request_paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    fn push(
        &self,
        method: &str,
        path: &str,
        query_contains: Option<String>,
        status: u16,
        body: String,
    ) {
        let method = Method::from_bytes(method.as_bytes()).expect("invalid HTTP method");
        self.shared
            .scripted
            .lock()
            .expect("mock backend lock poisoned")
            .push(ScriptedResponse {
                method,
                path: path.to_string(),
                query_contains,
                status,
                body,
            });
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let query = uri.query().map(str::to_string);

    let scripted = shared
        .scripted
        .lock()
        .expect("mock backend lock poisoned")
        .iter()
        .rev()
        .find(|s| s.matches(&method, &path, query.as_deref()))
        .cloned();

    shared
        .requests
        .lock()
        .expect("mock backend lock poisoned")
        .push(RecordedRequest {
            method: method.to_string(),
            path,
            query,
            body: String::from_utf8_lossy(&body).into_owned(),
        });

    let (status, body) = scripted
        .map(|s| (s.status, s.body))
        .unwrap_or((200, "{}".to_string()));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_keep_wire_order() {
        let request = RecordedRequest {
            method: "POST".to_string(),
            path: "/extract_entity_v2".to_string(),
            query: Some("tenant_key=0&time_from_minutes=21600&time_to_minutes=0".to_string()),
            body: String::new(),
        };

        let keys: Vec<String> = request.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            ["tenant_key", "time_from_minutes", "time_to_minutes"]
        );
        assert_eq!(request.query_param("time_from_minutes").as_deref(), Some("21600"));
    }

    #[test]
    fn test_scripted_response_matching() {
        let scripted = ScriptedResponse {
            method: Method::POST,
            path: "/extract_configs".to_string(),
            query_contains: Some("tenant_key=1".to_string()),
            status: 500,
            body: String::new(),
        };

        assert!(scripted.matches(&Method::POST, "/extract_configs", Some("tenant_key=1")));
        assert!(!scripted.matches(&Method::POST, "/extract_configs", Some("tenant_key=0")));
        assert!(!scripted.matches(&Method::GET, "/extract_configs", Some("tenant_key=1")));
    }
}

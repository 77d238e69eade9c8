//! Render request context.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use http::Method;
use serde::{Deserialize, Serialize};

/// Unique request identifier for log correlation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    ///
    /// Combines wall-clock nanoseconds with a process-wide counter, so two
    /// IDs generated in the same process never collide.
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

        Self(format!("{:x}-{:x}", nanos, seq))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Query string parameters (values are kept as received).
pub type QueryParams = HashMap<String, String>;

/// HTTP headers.
pub type Headers = HashMap<String, String>;

/// Why a request is being rendered through the error path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRender {
    /// HTTP status the error page answers with.
    pub status_code: u16,
    /// Short, user-presentable description.
    pub message: String,
}

impl ErrorRender {
    /// Create an error render marker.
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    /// Marker for an unknown route.
    pub fn not_found() -> Self {
        Self::new(404, "This page could not be found.")
    }

    /// Marker for a failure while producing the page.
    pub fn internal() -> Self {
        Self::new(500, "An unexpected error has occurred.")
    }
}

/// One inbound page-render request.
///
/// Created per HTTP request by the host and dropped once the response has
/// been written. Nothing in it outlives the request.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Route path, without the query string.
    pub path: String,
    /// Query string parameters.
    pub query: QueryParams,
    /// HTTP headers.
    pub headers: Headers,
    /// Set when this render produces the error page.
    pub error: Option<ErrorRender>,
}

impl RenderRequest {
    /// Create a new render request for a path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::generate(),
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HashMap::new(),
            error: None,
        }
    }

    /// Create a request from a path that may carry a query string.
    pub fn from_path_with_query(method: Method, path_with_query: &str) -> Self {
        let (path, query) = match path_with_query.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (path_with_query, HashMap::new()),
        };

        let path = if path.is_empty() { "/" } else { path };
        let mut request = Self::new(method, path);
        request.query = query;
        request
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Turn this request into an error-path render of the same route.
    ///
    /// The request ID and context are preserved so both renders correlate.
    pub fn into_error_render(mut self, error: ErrorRender) -> Self {
        self.error = Some(error);
        self
    }

    /// Whether this render takes the error path.
    pub fn is_error_render(&self) -> bool {
        self.error.is_some()
    }

    /// Get a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(|s| s.as_str())
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a cookie value by name from the `Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }
}

fn parse_query(query: &str) -> QueryParams {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

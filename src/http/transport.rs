//! Transport abstraction
//!
//! The pagination cursor and the aggregation engine only ever need to issue
//! one HTTP-shaped request and get back a status, headers, and a raw body.
//! `Transport` is that seam; `HttpClient` is the production implementation.

use crate::error::{ApiErrorBody, Error, Result};
use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// Total number of items matching the request
pub const PAGINATION_TOTAL: &str = "X-Tracker-Pagination-Total";
/// Offset the server applied
pub const PAGINATION_OFFSET: &str = "X-Tracker-Pagination-Offset";
/// Limit the server applied
pub const PAGINATION_LIMIT: &str = "X-Tracker-Pagination-Limit";
/// Number of items in this response
pub const PAGINATION_RETURNED: &str = "X-Tracker-Pagination-Returned";

// ============================================================================
// Request
// ============================================================================

/// A single request to the API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API root, or an absolute URL
    pub path: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<JsonValue>,
}

impl ApiRequest {
    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a POST request with a JSON body
    pub fn post(path: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a query parameter, replacing any existing value for the key
    #[must_use]
    pub fn set_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.query.retain(|(k, _)| *k != key);
        self.query.push((key, value.into()));
        self
    }

    /// Look up a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Response
// ============================================================================

/// A successful (2xx) response
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: String,
}

impl ApiResponse {
    /// Create a response with no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Read the `X-Tracker-Pagination-*` headers
    pub fn pagination(&self) -> PaginationHeaders {
        PaginationHeaders::from_headers(&self.headers)
    }
}

/// Pagination metadata the server reports in response headers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationHeaders {
    pub total: Option<u64>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub returned: Option<u64>,
}

impl PaginationHeaders {
    /// Extract pagination values from a header map
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok())
        };
        Self {
            total: read(PAGINATION_TOTAL),
            offset: read(PAGINATION_OFFSET),
            limit: read(PAGINATION_LIMIT),
            returned: read(PAGINATION_RETURNED),
        }
    }
}

/// Build the API error for a non-2xx response body
pub fn api_error(status: u16, body: &str) -> Error {
    let decoded = serde_json::from_str::<ApiErrorBody>(body).ok();
    Error::api(status, decoded)
}

// ============================================================================
// Transport
// ============================================================================

/// Issues one request and returns the successful response.
///
/// Implementations map non-2xx statuses to `Error::Api` and connection
/// failures to `Error::Http`. No implementation retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request
    async fn issue(&self, request: ApiRequest) -> Result<ApiResponse>;
}

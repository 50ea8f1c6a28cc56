//! Pagination types and traits
//!
//! Defines the request factory abstraction and the state a cursor tracks.

use crate::http::ApiRequest;

/// The slice of a collection a single request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Index of the first item
    pub offset: u64,
    /// Maximum number of items
    pub limit: u64,
}

impl PageWindow {
    /// Create a window
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// The zero-length window used to learn a collection's total size
    pub fn probe() -> Self {
        Self {
            offset: 0,
            limit: 0,
        }
    }
}

/// Produces the request for one page of a collection.
///
/// A cursor calls this once for the probe and once per page. Calls with the
/// same window must describe the same server-side query.
pub trait RequestFactory: Send + Sync {
    /// Build the request for `window`
    fn request(&self, window: PageWindow) -> ApiRequest;
}

impl<F> RequestFactory for F
where
    F: Fn(PageWindow) -> ApiRequest + Send + Sync,
{
    fn request(&self, window: PageWindow) -> ApiRequest {
        self(window)
    }
}

/// A GET request on a list endpoint, paged with `limit`/`offset` parameters
#[derive(Debug, Clone)]
pub struct ListRequest {
    path: String,
    query: Vec<(String, String)>,
}

impl ListRequest {
    /// Create a list request for `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Add a fixed query parameter (filter, sort order, ...)
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter only when a value is present
    #[must_use]
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value.to_string()),
            None => self,
        }
    }

    /// Endpoint path
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl RequestFactory for ListRequest {
    fn request(&self, window: PageWindow) -> ApiRequest {
        let mut request = ApiRequest::get(self.path.clone());
        request.query.clone_from(&self.query);
        request
            .set_query("limit", window.limit.to_string())
            .set_query("offset", window.offset.to_string())
    }
}

/// Total item count as reported by the probe request.
///
/// Taken once when the cursor is created and never refreshed. If the
/// collection changes during iteration the cursor keeps using this value to
/// decide whether more pages may exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleCountSnapshot {
    total: u64,
}

impl StaleCountSnapshot {
    /// Record a total
    pub fn new(total: u64) -> Self {
        Self { total }
    }

    /// The recorded total
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether a page starting at `offset` may still hold items
    pub fn covers(&self, offset: u64) -> bool {
        offset < self.total
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Offset of the next page
    pub offset: u64,
    /// Pages fetched so far (the probe excluded)
    pub pages: u32,
    /// Items received so far
    pub total_fetched: u64,
    /// No further pages will be requested
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Add offset
    pub fn add_offset(&mut self, amount: u64) {
        self.offset += amount;
    }

    /// Record a received page
    pub fn record_page(&mut self, items: usize) {
        self.pages += 1;
        self.total_fetched += items as u64;
    }
}

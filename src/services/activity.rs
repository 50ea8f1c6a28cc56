//! Project activity feed

use crate::error::Result;
use crate::http::{ApiRequest, Transport};
use crate::models::Activity;
use crate::pagination::{Cursor, ListRequest};
use crate::types::SortOrder;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;

/// Filters for the activity feed. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityQuery {
    pub sort_order: Option<SortOrder>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub occurred_before: Option<DateTime<Utc>>,
    pub occurred_after: Option<DateTime<Utc>>,
    pub since_version: Option<u64>,
}

impl ActivityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn occurred_before(mut self, at: DateTime<Utc>) -> Self {
        self.occurred_before = Some(at);
        self
    }

    #[must_use]
    pub fn occurred_after(mut self, at: DateTime<Utc>) -> Self {
        self.occurred_after = Some(at);
        self
    }

    #[must_use]
    pub fn since_version(mut self, version: u64) -> Self {
        self.since_version = Some(version);
        self
    }

    /// Whether the caller asked for an explicit slice of the feed
    pub fn is_windowed(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }

    /// Filter parameters, without `limit`/`offset`
    fn filters(&self) -> Vec<(&'static str, String)> {
        let timestamp = |at: &DateTime<Utc>| at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut params = Vec::new();
        if let Some(order) = self.sort_order {
            params.push(("sort_order", order.as_str().to_string()));
        }
        if let Some(at) = &self.occurred_before {
            params.push(("occurred_before", timestamp(at)));
        }
        if let Some(at) = &self.occurred_after {
            params.push(("occurred_after", timestamp(at)));
        }
        if let Some(version) = self.since_version {
            params.push(("since_version", version.to_string()));
        }
        params
    }

    fn list_request(&self, project_id: u64) -> ListRequest {
        self.filters()
            .into_iter()
            .fold(ListRequest::new(activity_path(project_id)), |req, (k, v)| {
                req.query(k, v)
            })
    }
}

fn activity_path(project_id: u64) -> String {
    format!("projects/{project_id}/activity")
}

/// Activity of a project
#[derive(Clone)]
pub struct ActivityService {
    transport: Arc<dyn Transport>,
    page_size: u32,
}

impl ActivityService {
    pub fn new(transport: Arc<dyn Transport>, page_size: u32) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    /// Activity matching `query`.
    ///
    /// With an explicit `limit` or `offset` that slice is fetched as-is in
    /// one request. Otherwise the whole feed is fetched in a single page.
    pub async fn list(&self, project_id: u64, query: &ActivityQuery) -> Result<Vec<Activity>> {
        if !query.is_windowed() {
            let request = query.list_request(project_id);
            return Cursor::new(self.transport.clone(), request, 0).await?.all().await;
        }

        let mut request = ApiRequest::get(activity_path(project_id));
        for (key, value) in query.filters() {
            request = request.query(key, value);
        }
        if let Some(limit) = query.limit {
            request = request.query("limit", limit.to_string());
        }
        if let Some(offset) = query.offset {
            request = request.query("offset", offset.to_string());
        }
        self.transport.issue(request).await?.json()
    }

    /// Cursor over the activity matching `query`. `limit` and `offset` are
    /// ignored; the cursor pages with the configured page size.
    pub async fn iterate(&self, project_id: u64, query: &ActivityQuery) -> Result<Cursor<Activity>> {
        let request = query.list_request(project_id);
        Cursor::new(self.transport.clone(), request, self.page_size).await
    }
}

impl std::fmt::Debug for ActivityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityService")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

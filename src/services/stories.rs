//! Story endpoints

use crate::error::Result;
use crate::http::{ApiRequest, Transport};
use crate::models::{decode_entities, decode_entity, Comment, Story};
use crate::pagination::{Cursor, ListRequest};
use crate::types::JsonValue;
use std::sync::Arc;

/// Stories of a project
#[derive(Clone)]
pub struct StoryService {
    transport: Arc<dyn Transport>,
    page_size: u32,
}

impl StoryService {
    pub fn new(transport: Arc<dyn Transport>, page_size: u32) -> Self {
        Self {
            transport,
            page_size,
        }
    }

    fn list_request(project_id: u64, filter: Option<&str>) -> ListRequest {
        ListRequest::new(format!("projects/{project_id}/stories"))
            .query_opt("filter", filter.filter(|f| !f.is_empty()))
    }

    /// Every story matching `filter`, fetched in a single page
    pub async fn list(&self, project_id: u64, filter: Option<&str>) -> Result<Vec<Story>> {
        let request = Self::list_request(project_id, filter);
        Cursor::new(self.transport.clone(), request, 0).await?.all().await
    }

    /// Cursor over the stories matching `filter`, fetched page by page
    pub async fn iterate(&self, project_id: u64, filter: Option<&str>) -> Result<Cursor<Story>> {
        let request = Self::list_request(project_id, filter);
        Cursor::new(self.transport.clone(), request, self.page_size).await
    }

    pub async fn get(&self, project_id: u64, story_id: u64) -> Result<Story> {
        let path = format!("projects/{project_id}/stories/{story_id}");
        let value: JsonValue = self.transport.issue(ApiRequest::get(path)).await?.json()?;
        decode_entity(value)
    }

    pub async fn comments(&self, project_id: u64, story_id: u64) -> Result<Vec<Comment>> {
        let path = format!("projects/{project_id}/stories/{story_id}/comments");
        let value: JsonValue = self.transport.issue(ApiRequest::get(path)).await?.json()?;
        decode_entities(value)
    }
}

impl std::fmt::Debug for StoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryService")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

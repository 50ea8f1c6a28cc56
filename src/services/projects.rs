//! Projects, the authenticated user, and search

use super::get_value;
use crate::error::Result;
use crate::http::{ApiRequest, Transport};
use crate::models::{decode_entities, decode_entity, Me, Project, SearchResponse};
use std::sync::Arc;

/// Projects visible to the token
#[derive(Clone)]
pub struct ProjectService {
    transport: Arc<dyn Transport>,
}

impl ProjectService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        let value = get_value(self.transport.as_ref(), ApiRequest::get("projects")).await?;
        decode_entities(value)
    }

    pub async fn get(&self, project_id: u64) -> Result<Project> {
        let request = ApiRequest::get(format!("projects/{project_id}"));
        decode_entity(get_value(self.transport.as_ref(), request).await?)
    }
}

/// The user the token belongs to
#[derive(Clone)]
pub struct MeService {
    transport: Arc<dyn Transport>,
}

impl MeService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get(&self) -> Result<Me> {
        decode_entity(get_value(self.transport.as_ref(), ApiRequest::get("me")).await?)
    }
}

/// Full-text search within a project
#[derive(Clone)]
pub struct SearchService {
    transport: Arc<dyn Transport>,
}

impl SearchService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn search(&self, project_id: u64, query: &str) -> Result<SearchResponse> {
        let request = ApiRequest::get(format!("projects/{project_id}/search")).query("query", query);
        self.transport.issue(request).await?.json()
    }
}

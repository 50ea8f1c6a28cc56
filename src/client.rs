//! Top-level API client

use crate::aggregator::{Aggregation, CorrelationStrategy};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpClient, Transport};
use crate::models::{Me, SearchResponse};
use crate::services::{
    AccountService, ActivityService, EpicService, IterationService, MeService, MembershipService,
    ProjectService, SearchService, StoryService,
};
use std::sync::Arc;
use tracing::debug;

/// Entry point to the Tracker API.
///
/// Owns the shared transport. Services are cheap handles onto it, and every
/// call to [`TrackerClient::aggregation`] returns a fresh, independent
/// aggregation.
#[derive(Clone)]
pub struct TrackerClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
    aggregator_url: String,
    path_prefix: String,
}

impl TrackerClient {
    /// Build a client talking HTTP, as configured
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(&config)?;
        Self::with_transport(Arc::new(http), config)
    }

    /// Build a client over an existing transport
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Result<Self> {
        let aggregator_url = config.aggregator_url()?.to_string();
        let path_prefix = config.api_path_prefix()?;
        debug!(aggregator_url = %aggregator_url, path_prefix = %path_prefix, "Client ready");

        Ok(Self {
            transport,
            config,
            aggregator_url,
            path_prefix,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    pub fn stories(&self) -> StoryService {
        StoryService::new(self.transport.clone(), self.config.page_size)
    }

    pub fn activity(&self) -> ActivityService {
        ActivityService::new(self.transport.clone(), self.config.page_size)
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.transport.clone())
    }

    pub fn me(&self) -> MeService {
        MeService::new(self.transport.clone())
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.transport.clone())
    }

    /// Project memberships
    pub fn memberships(&self) -> MembershipService {
        MembershipService::new(self.transport.clone())
    }

    pub fn iterations(&self) -> IterationService {
        IterationService::new(self.transport.clone())
    }

    pub fn epics(&self) -> EpicService {
        EpicService::new(self.transport.clone())
    }

    /// The authenticated user
    pub async fn current_user(&self) -> Result<Me> {
        self.me().get().await
    }

    pub async fn search(&self, project_id: u64, query: &str) -> Result<SearchResponse> {
        SearchService::new(self.transport.clone())
            .search(project_id, query)
            .await
    }

    /// A new, empty aggregation using the configured endpoint and batch size
    pub fn aggregation(&self, strategy: CorrelationStrategy) -> Aggregation {
        Aggregation::new(self.transport.clone(), self.aggregator_url.clone(), strategy)
            .with_path_prefix(self.path_prefix.clone())
            .with_batch_size(self.config.batch_size)
    }
}

impl std::fmt::Debug for TrackerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerClient")
            .field("base_url", &self.config.base_url)
            .field("aggregator_url", &self.aggregator_url)
            .finish_non_exhaustive()
    }
}

//! Batch aggregation engine

use super::correlation::{check_fragment, Correlation};
use super::paths;
use super::types::{
    BatchReceipt, CorrelationKey, CorrelationStrategy, DispatchSummary, RequestKind, Resolved,
    StoryBundle, SubRequest,
};
use crate::error::{Error, Result};
use crate::http::{ApiRequest, Transport};
use crate::models::{decode_entities, decode_entity, Comment, Review, Story};
use crate::types::{JsonObject, JsonValue};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default sub-requests per aggregator call
pub const DEFAULT_BATCH_SIZE: usize = 15;

/// Default path prefix of sub-URLs
pub const DEFAULT_PATH_PREFIX: &str = "/services/v5";

/// Queues GET sub-requests, sends them to the aggregator endpoint in
/// chunks, and keeps the fragments for typed lookup.
///
/// An aggregation is single-use in spirit: queue, dispatch, resolve. More
/// requests can be queued after a dispatch; previously received fragments
/// are kept and overwritten by newer ones for the same key.
pub struct Aggregation {
    transport: Arc<dyn Transport>,
    aggregator_url: String,
    path_prefix: String,
    batch_size: usize,
    queue: VecDeque<SubRequest>,
    correlation: Correlation,
    batches_sent: usize,
}

impl Aggregation {
    /// Create an empty aggregation posting to `aggregator_url`
    pub fn new(
        transport: Arc<dyn Transport>,
        aggregator_url: impl Into<String>,
        strategy: CorrelationStrategy,
    ) -> Self {
        Self {
            transport,
            aggregator_url: aggregator_url.into(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            queue: VecDeque::new(),
            correlation: Correlation::new(strategy),
            batches_sent: 0,
        }
    }

    /// Set the chunk size; values below 1 are raised to 1
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the path prefix sub-URLs are built with
    #[must_use]
    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into().trim_end_matches('/').to_string();
        self
    }

    pub fn strategy(&self) -> CorrelationStrategy {
        self.correlation.strategy()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Sub-requests not yet sent
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Chunks sent so far
    pub fn batches_sent(&self) -> usize {
        self.batches_sent
    }

    // ========================================================================
    // Queueing
    // ========================================================================

    /// Queue an arbitrary sub-request
    pub fn queue(&mut self, request: SubRequest) -> &mut Self {
        self.queue.push_back(request);
        self
    }

    fn enqueue(&mut self, kind: RequestKind, key: CorrelationKey) -> &mut Self {
        let request = SubRequest::new(&self.path_prefix, kind, key);
        self.queue(request)
    }

    /// Queue a story within a project
    pub fn queue_story(&mut self, project_id: u64, story_id: u64) -> &mut Self {
        self.enqueue(
            RequestKind::Story,
            CorrelationKey::project_story(project_id, story_id),
        )
    }

    /// Queue a story by ID alone
    pub fn queue_story_by_id(&mut self, story_id: u64) -> &mut Self {
        self.enqueue(RequestKind::Story, CorrelationKey::story(story_id))
    }

    /// Queue several stories of one project
    pub fn queue_stories(&mut self, project_id: u64, story_ids: &[u64]) -> &mut Self {
        for &story_id in story_ids {
            self.queue_story(project_id, story_id);
        }
        self
    }

    /// Queue a story's comments
    pub fn queue_comments(&mut self, project_id: u64, story_id: u64) -> &mut Self {
        self.enqueue(
            RequestKind::Comments,
            CorrelationKey::project_story(project_id, story_id),
        )
    }

    /// Queue the comments of several stories
    pub fn queue_comments_of_stories(&mut self, project_id: u64, story_ids: &[u64]) -> &mut Self {
        for &story_id in story_ids {
            self.queue_comments(project_id, story_id);
        }
        self
    }

    /// Queue a story's reviews
    pub fn queue_reviews(&mut self, project_id: u64, story_id: u64) -> &mut Self {
        self.enqueue(
            RequestKind::Reviews,
            CorrelationKey::project_story(project_id, story_id),
        )
    }

    /// Queue the reviews of several stories
    pub fn queue_reviews_of_stories(&mut self, project_id: u64, story_ids: &[u64]) -> &mut Self {
        for &story_id in story_ids {
            self.queue_reviews(project_id, story_id);
        }
        self
    }

    /// Queue a story together with its comments and reviews
    pub fn queue_story_bundle(&mut self, project_id: u64, story_id: u64) -> &mut Self {
        self.queue_story(project_id, story_id)
            .queue_comments(project_id, story_id)
            .queue_reviews(project_id, story_id)
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Send the next chunk of at most `batch_size` sub-requests.
    ///
    /// Returns `Ok(None)` once the queue is empty. The chunk leaves the queue
    /// before it is sent, so a failed chunk is not retried while the chunks
    /// behind it stay queued.
    pub async fn send_next(&mut self) -> Result<Option<BatchReceipt>> {
        let take = self.batch_size.min(self.queue.len());
        if take == 0 {
            return Ok(None);
        }

        let chunk: Vec<SubRequest> = self.queue.drain(..take).collect();
        let index = self.batches_sent;
        self.batches_sent += 1;

        let sub_urls: Vec<&str> = chunk.iter().map(|r| r.path.as_str()).collect();
        debug!(batch = index, size = chunk.len(), "Sending aggregator batch");

        let response = self
            .transport
            .issue(ApiRequest::post(
                self.aggregator_url.clone(),
                JsonValue::from(sub_urls),
            ))
            .await?;
        let fragments: JsonObject = response.json()?;

        for request in &chunk {
            match fragments.get(&request.path) {
                Some(fragment) => self.correlation.absorb(request, fragment.clone()),
                None => {
                    warn!(path = %request.path, "Aggregator response has no fragment for sub-request");
                }
            }
        }
        for path in fragments.keys() {
            if !chunk.iter().any(|request| &request.path == path) {
                warn!(path = %path, "Ignoring fragment for a sub-URL that was not requested");
            }
        }

        let received = chunk
            .iter()
            .filter(|request| fragments.contains_key(&request.path))
            .map(|request| request.path.as_str())
            .collect::<HashSet<_>>()
            .len();

        Ok(Some(BatchReceipt {
            index,
            requested: chunk.len(),
            received,
            remaining: self.queue.len(),
        }))
    }

    /// Send every queued sub-request, chunk by chunk.
    ///
    /// Stops at the first failing chunk; fragments from earlier chunks are
    /// kept and the remaining chunks stay queued.
    pub async fn dispatch(&mut self) -> Result<DispatchSummary> {
        let mut summary = DispatchSummary::default();

        while let Some(receipt) = self.send_next().await? {
            summary.batches += 1;
            summary.sub_requests += receipt.requested;
            summary.fragments += receipt.received;
        }

        info!(
            batches = summary.batches,
            sub_requests = summary.sub_requests,
            fragments = summary.fragments,
            "Aggregation dispatched"
        );
        Ok(summary)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Name of a lookup in errors: the sub-URL under URL correlation, the
    /// story part under ID correlation
    fn label(&self, kind: RequestKind, key: CorrelationKey) -> String {
        match self.strategy() {
            CorrelationStrategy::ByUrl => self.correlation.sent_path(kind, key).map_or_else(
                || paths::build(&self.path_prefix, kind, key),
                ToString::to_string,
            ),
            CorrelationStrategy::ById => format!("{kind} of story {}", key.story_id()),
        }
    }

    fn fragment(&self, kind: RequestKind, key: CorrelationKey) -> Result<JsonValue> {
        let fragment = self
            .correlation
            .lookup(kind, key)
            .ok_or_else(|| Error::not_found(self.label(kind, key)))?;
        check_fragment(&fragment, &self.label(kind, key))?;
        Ok(fragment)
    }

    /// Decode the fragment of the request queued for `kind` and `key`
    pub fn resolve(&self, kind: RequestKind, key: CorrelationKey) -> Result<Resolved> {
        Resolved::decode(kind, self.fragment(kind, key)?)
    }

    /// Decode the fragment for a sub-URL as it was queued
    pub fn resolve_path(&self, path: &str) -> Result<Resolved> {
        let (kind, fragment) = self
            .correlation
            .lookup_path(path)
            .ok_or_else(|| Error::not_found(path))?;

        check_fragment(&fragment, path)?;
        Resolved::decode(kind, fragment)
    }

    /// Story within a project
    pub fn story(&self, project_id: u64, story_id: u64) -> Result<Story> {
        let key = CorrelationKey::project_story(project_id, story_id);
        let fragment = self.fragment(RequestKind::Story, key)?;
        decode_entity(fragment)
    }

    /// Story queued by ID alone
    pub fn story_by_id(&self, story_id: u64) -> Result<Story> {
        let fragment = self.fragment(RequestKind::Story, CorrelationKey::story(story_id))?;
        decode_entity(fragment)
    }

    /// Comments of a story within a project
    pub fn comments(&self, project_id: u64, story_id: u64) -> Result<Vec<Comment>> {
        let key = CorrelationKey::project_story(project_id, story_id);
        let fragment = self.fragment(RequestKind::Comments, key)?;
        decode_entities(fragment)
    }

    /// Reviews of a story within a project
    pub fn reviews(&self, project_id: u64, story_id: u64) -> Result<Vec<Review>> {
        let key = CorrelationKey::project_story(project_id, story_id);
        let fragment = self.fragment(RequestKind::Reviews, key)?;
        decode_entities(fragment)
    }

    /// Everything received about a story. Requires ID correlation.
    pub fn bundle(&self, story_id: u64) -> Result<StoryBundle> {
        let raw = self
            .correlation
            .bundle(story_id)?
            .ok_or_else(|| Error::not_found(format!("bundle of story {story_id}")))?;

        let mut bundle = StoryBundle {
            story_id,
            ..Default::default()
        };
        for kind in [RequestKind::Story, RequestKind::Comments, RequestKind::Reviews] {
            let Some(part) = raw.part(kind) else {
                continue;
            };
            check_fragment(&part, &format!("{kind} of story {story_id}"))?;
            match Resolved::decode(kind, part)? {
                Resolved::Story(story) => bundle.story = Some(story),
                Resolved::Comments(comments) => bundle.comments = Some(comments),
                Resolved::Reviews(reviews) => bundle.reviews = Some(reviews),
            }
        }
        Ok(bundle)
    }

    /// Story IDs that have received fragments, ascending
    pub fn story_ids(&self) -> Vec<u64> {
        self.correlation.story_ids()
    }

    /// Stored entries: sub-URLs under URL correlation, stories under ID
    /// correlation
    pub fn received(&self) -> usize {
        self.correlation.len()
    }
}

impl std::fmt::Debug for Aggregation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregation")
            .field("aggregator_url", &self.aggregator_url)
            .field("strategy", &self.strategy())
            .field("batch_size", &self.batch_size)
            .field("pending", &self.queue.len())
            .field("batches_sent", &self.batches_sent)
            .finish_non_exhaustive()
    }
}

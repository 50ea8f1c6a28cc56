//! Aggregator module
//!
//! Batches many independent GET requests into a few calls to the API's
//! aggregator endpoint.
//!
//! # Overview
//!
//! The aggregator accepts a JSON array of sub-URLs and answers with a JSON
//! object mapping each sub-URL to what a plain GET of it would have
//! returned. An [`Aggregation`] queues [`SubRequest`]s, sends them in chunks
//! of `batch_size`, and stores the fragments under one of two
//! [`CorrelationStrategy`]s:
//!
//! - `ByUrl` keeps each fragment under the exact sub-URL that was queued,
//!   and finds it again by the request's kind and key.
//! - `ById` splits fragments into per-story bundles keyed by the story ID
//!   found in the payload, so one lookup yields a story with its comments
//!   and reviews. Items one sub-URL carries for another story are appended
//!   to that story's own list, never substituted for it.
//!
//! Fragments stay raw until looked up; a malformed or error fragment only
//! fails its own lookup.
//!
//! ```rust,ignore
//! let mut agg = Aggregation::new(transport, aggregator_url, CorrelationStrategy::ByUrl);
//! agg.queue_stories(99, &[1, 2, 3]).queue_comments(99, 1);
//! agg.dispatch().await?;
//! let story = agg.story(99, 2)?;
//! ```

mod correlation;
mod engine;
pub mod paths;
mod types;

pub use engine::{Aggregation, DEFAULT_BATCH_SIZE, DEFAULT_PATH_PREFIX};
pub use types::{
    BatchReceipt, CorrelationKey, CorrelationStrategy, DispatchSummary, RequestKind, Resolved,
    StoryBundle, SubRequest,
};

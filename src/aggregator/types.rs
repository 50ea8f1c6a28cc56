//! Aggregator types
//!
//! Sub-request descriptions, correlation keys and the typed results handed
//! back after a dispatch.

use super::paths;
use crate::error::Result;
use crate::models::{decode_entities, decode_entity, Comment, Review, Story};
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a sub-request asks for, and therefore what its fragment decodes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    /// A single story object
    Story,
    /// The comment array of a story
    Comments,
    /// The review array of a story
    Reviews,
}

impl RequestKind {
    /// Infer the kind from a sub-URL: a path containing `/comments` is
    /// Comments, one containing `/reviews` is Reviews, anything else a Story.
    /// The query string is ignored.
    pub fn infer(path: &str) -> Self {
        let path = path.split('?').next().unwrap_or(path);
        if path.contains("/comments") {
            Self::Comments
        } else if path.contains("/reviews") {
            Self::Reviews
        } else {
            Self::Story
        }
    }

    /// Get the kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Comments => "comments",
            Self::Reviews => "reviews",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies which story a sub-request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationKey {
    /// A story addressed through its project
    ProjectStory { project_id: u64, story_id: u64 },
    /// A story addressed by ID alone
    Story { story_id: u64 },
}

impl CorrelationKey {
    /// Key for a story within a project
    pub fn project_story(project_id: u64, story_id: u64) -> Self {
        Self::ProjectStory {
            project_id,
            story_id,
        }
    }

    /// Key for a story addressed by ID alone
    pub fn story(story_id: u64) -> Self {
        Self::Story { story_id }
    }

    pub fn story_id(&self) -> u64 {
        match self {
            Self::ProjectStory { story_id, .. } | Self::Story { story_id } => *story_id,
        }
    }

    pub fn project_id(&self) -> Option<u64> {
        match self {
            Self::ProjectStory { project_id, .. } => Some(*project_id),
            Self::Story { .. } => None,
        }
    }
}

impl fmt::Display for CorrelationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProjectStory {
                project_id,
                story_id,
            } => write!(f, "project {project_id} story {story_id}"),
            Self::Story { story_id } => write!(f, "story {story_id}"),
        }
    }
}

/// One queued GET, expressed as the sub-URL the aggregator will run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRequest {
    /// Sub-URL, also the key of its fragment in the aggregator response
    pub path: String,
    /// What the fragment decodes to
    pub kind: RequestKind,
    /// Story the request is about
    pub key: CorrelationKey,
}

impl SubRequest {
    /// Build the canonical sub-request for `kind` and `key`
    pub fn new(prefix: &str, kind: RequestKind, key: CorrelationKey) -> Self {
        Self {
            path: paths::build(prefix, kind, key),
            kind,
            key,
        }
    }

    /// Wrap a caller-supplied sub-URL, inferring its kind
    pub fn from_path(path: impl Into<String>, key: CorrelationKey) -> Self {
        let path = path.into();
        Self {
            kind: RequestKind::infer(&path),
            path,
            key,
        }
    }
}

/// How fragments are matched back to the requests that produced them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrategy {
    /// Fragments are stored under their exact sub-URL
    #[default]
    ByUrl,
    /// Fragments are split into per-story bundles keyed by the story ID
    /// found in the payload
    ById,
}

/// A decoded fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Story(Story),
    Comments(Vec<Comment>),
    Reviews(Vec<Review>),
}

impl Resolved {
    /// Decode a raw fragment as `kind`
    pub fn decode(kind: RequestKind, value: JsonValue) -> Result<Self> {
        Ok(match kind {
            RequestKind::Story => Self::Story(decode_entity(value)?),
            RequestKind::Comments => Self::Comments(decode_entities(value)?),
            RequestKind::Reviews => Self::Reviews(decode_entities(value)?),
        })
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Story(_) => RequestKind::Story,
            Self::Comments(_) => RequestKind::Comments,
            Self::Reviews(_) => RequestKind::Reviews,
        }
    }
}

/// Everything fetched about one story under ID correlation.
///
/// A `None` part was not requested, or its fragment could not be attributed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryBundle {
    pub story_id: u64,
    pub story: Option<Story>,
    pub comments: Option<Vec<Comment>>,
    pub reviews: Option<Vec<Review>>,
}

/// Outcome of sending one chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReceipt {
    /// Zero-based index of the chunk within this aggregation
    pub index: usize,
    /// Sub-requests in the chunk
    pub requested: usize,
    /// Distinct sub-URLs of the chunk that the response answered
    pub received: usize,
    /// Sub-requests still queued
    pub remaining: usize,
}

/// Totals for a full dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub batches: usize,
    pub sub_requests: usize,
    pub fragments: usize,
}

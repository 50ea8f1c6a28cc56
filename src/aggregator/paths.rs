//! Sub-URL construction
//!
//! Sub-URLs are absolute paths on the API host (`/services/v5/...`), which
//! is the form the aggregator both accepts and echoes back as response keys.

use super::types::{CorrelationKey, RequestKind};

/// Field selection sent with every review sub-request
pub const REVIEW_FIELDS: &str =
    "id,story_id,review_type,review_type_id,reviewer_id,status,created_at,updated_at,kind";

/// Sub-URL of a story
pub fn story(prefix: &str, key: CorrelationKey) -> String {
    match key {
        CorrelationKey::ProjectStory {
            project_id,
            story_id,
        } => format!("{prefix}/projects/{project_id}/stories/{story_id}"),
        CorrelationKey::Story { story_id } => format!("{prefix}/stories/{story_id}"),
    }
}

/// Sub-URL of a story's comments
pub fn comments(prefix: &str, key: CorrelationKey) -> String {
    format!("{}/comments", story(prefix, key))
}

/// Sub-URL of a story's reviews
pub fn reviews(prefix: &str, key: CorrelationKey) -> String {
    format!("{}/reviews?fields={REVIEW_FIELDS}", story(prefix, key))
}

/// Sub-URL for any request kind
pub fn build(prefix: &str, kind: RequestKind, key: CorrelationKey) -> String {
    match kind {
        RequestKind::Story => story(prefix, key),
        RequestKind::Comments => comments(prefix, key),
        RequestKind::Reviews => reviews(prefix, key),
    }
}

//! Stories and the resources hanging off them

use super::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Story type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    Feature,
    Bug,
    Chore,
    Release,
}

/// Story workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryState {
    Unscheduled,
    Planned,
    Unstarted,
    Started,
    Finished,
    Delivered,
    Accepted,
    Rejected,
}

/// A story
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Story {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_type: Option<StoryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<StoryState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_by_id: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owner_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub label_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub follower_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comment_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Entity for Story {
    const KIND: &'static str = "story";

    fn entity_id(&self) -> u64 {
        self.id
    }
}

/// A label attached to a story
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// A person (owner, requester, commenter)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub initials: String,
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// A comment on a story
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    pub id: u64,
    pub story_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epic_id: Option<u64>,
    pub person_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_attachment_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub google_attachment_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Entity for Comment {
    const KIND: &'static str = "comment";

    fn entity_id(&self) -> u64 {
        self.id
    }
}

/// Review type as embedded in a review
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewType {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// A review on a story
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub id: u64,
    pub story_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_type: Option<ReviewType>,
    pub review_type_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<u64>,
    /// `unstarted`, `in_review`, `pass` or `revise`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Entity for Review {
    const KIND: &'static str = "review";

    fn entity_id(&self) -> u64 {
        self.id
    }
}

/// Response of the project search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub stories: SearchStories,
}

/// Story half of a search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchStories {
    pub stories: Vec<Story>,
    pub total_hits: u64,
}

//! Activity feed entries

use super::Person;
use crate::types::JsonValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One change inside an activity entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Change {
    pub kind: String,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub change_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_values: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_values: Option<JsonValue>,
}

/// Minimal project reference embedded in activity entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectReference {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// An activity feed entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub kind: String,
    pub guid: String,
    pub project_version: u64,
    pub message: String,
    pub highlight: String,
    pub changes: Vec<Change>,
    pub primary_resources: Vec<JsonValue>,
    pub secondary_resources: Vec<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_by: Option<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<DateTime<Utc>>,
}

//! Accounts, memberships, iterations and epics

use super::{Entity, Label, Person, Story};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account owning projects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub id: u64,
    pub name: String,
    pub plan: String,
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Account {
    const KIND: &'static str = "account";

    fn entity_id(&self) -> u64 {
        self.id
    }
}

/// A person's membership in an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountMembership {
    pub id: u64,
    pub person: Person,
    pub owner: bool,
    pub admin: bool,
    pub project_creator: bool,
    pub timekeeper: bool,
    pub time_enterer: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Entity for AccountMembership {
    const KIND: &'static str = "account membership";

    fn entity_id(&self) -> u64 {
        self.id
    }
}

/// A person's membership in a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMembership {
    pub id: u64,
    pub person: Person,
    pub project_id: u64,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_color: Option<String>,
    pub wants_comment_notification_emails: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ProjectMembership {
    const KIND: &'static str = "project membership";

    fn entity_id(&self) -> u64 {
        self.id
    }
}

/// One iteration of a project. Iterations are numbered from 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Iteration {
    pub number: u64,
    pub project_id: u64,
    pub length: u32,
    pub team_strength: f64,
    pub story_ids: Vec<u64>,
    pub stories: Vec<Story>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    pub points: f64,
    pub accepted_points: f64,
    pub effective_points: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl Entity for Iteration {
    const KIND: &'static str = "iteration";

    fn entity_id(&self) -> u64 {
        self.number
    }
}

/// An epic, grouping stories under one label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Epic {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Epic {
    const KIND: &'static str = "epic";

    fn entity_id(&self) -> u64 {
        self.id
    }
}

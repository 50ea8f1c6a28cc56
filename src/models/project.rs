//! Projects and the authenticated user

use super::Entity;
use crate::auth::TrackerToken;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// First day of the iteration week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Time zone attached to projects and users
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeZone {
    pub olson_name: String,
    pub offset: String,
}

/// A project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub version: u64,
    pub iteration_length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_start_day: Option<Day>,
    pub point_scale: String,
    pub bugs_and_chores_are_estimatable: bool,
    pub automatic_planning: bool,
    pub enable_tasks: bool,
    /// Calendar date, serialized as `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZone>,
    pub velocity_averaged_over: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project_type: String,
    pub public: bool,
    pub current_iteration_number: u32,
    pub current_velocity: u32,
    pub account_id: u64,
    pub story_ids: Vec<u64>,
    pub epic_ids: Vec<u64>,
    pub membership_ids: Vec<u64>,
    pub label_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Project {
    const KIND: &'static str = "project";

    fn entity_id(&self) -> u64 {
        self.id
    }
}

/// Project summary as listed on `/me`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeProject {
    pub kind: String,
    pub id: u64,
    pub project_id: u64,
    pub project_name: String,
    pub project_color: String,
    pub favorite: bool,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_viewed_at: Option<DateTime<Utc>>,
}

/// The authenticated user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Me {
    pub id: u64,
    pub name: String,
    pub initials: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZone>,
    #[serde(skip_serializing)]
    pub api_token: Option<TrackerToken>,
    pub has_google_identity: bool,
    pub projects: Vec<MeProject>,
    pub workspace_ids: Vec<u64>,
    pub receives_in_app_notifications: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Me {
    const KIND: &'static str = "me";

    fn entity_id(&self) -> u64 {
        self.id
    }
}

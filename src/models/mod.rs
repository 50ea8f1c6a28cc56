//! Domain entities returned by the Tracker API
//!
//! Plain serde structs. Every field the server may omit carries a default so
//! that partial payloads (e.g. a `fields=` restricted request) still decode.
//! `Entity` marks the types that have a numeric ID; decoding through
//! [`decode_entity`] rejects payloads where that ID is missing or zero, which
//! is how a fragment of the wrong shape is told apart from a genuine entity.

mod account;
mod activity;
mod project;
mod story;

pub use account::{Account, AccountMembership, Epic, Iteration, ProjectMembership};
pub use activity::{Activity, Change, ProjectReference};
pub use project::{Day, Me, MeProject, Project, TimeZone};
pub use story::{
    Comment, Label, Person, Review, ReviewType, SearchResponse, SearchStories, Story, StoryState,
    StoryType,
};

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::de::DeserializeOwned;

/// An API resource identified by a numeric ID
pub trait Entity {
    /// Resource name used in error messages
    const KIND: &'static str;

    /// The resource's own ID
    fn entity_id(&self) -> u64;
}

/// Decode a single entity, rejecting payloads without a non-zero ID
pub fn decode_entity<T: Entity + DeserializeOwned>(value: JsonValue) -> Result<T> {
    let entity: T = serde_json::from_value(value)?;
    if entity.entity_id() == 0 {
        return Err(Error::decode(format!("{} payload has no id", T::KIND)));
    }
    Ok(entity)
}

/// Decode an array of entities, applying the same ID check to each element
pub fn decode_entities<T: Entity + DeserializeOwned>(value: JsonValue) -> Result<Vec<T>> {
    let JsonValue::Array(items) = value else {
        return Err(Error::decode(format!(
            "expected an array of {}, got {}",
            T::KIND,
            json_type_name(&value)
        )));
    };
    items.into_iter().map(decode_entity).collect()
}

/// Short name of a JSON value's type, for error messages
pub(crate) fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

//! Auth credential types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracker API token
///
/// Serialized transparently so it can live in config files, but never
/// printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackerToken(String);

impl TrackerToken {
    /// Wrap a raw token value
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the auth header
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check whether the token is blank
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for TrackerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TrackerToken(***)")
    }
}

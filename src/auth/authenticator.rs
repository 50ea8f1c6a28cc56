//! Authenticator implementation
//!
//! Applies the API token to outgoing requests.

use super::types::TrackerToken;
use reqwest::RequestBuilder;

/// Header carrying the API token
pub const TOKEN_HEADER: &str = "X-TrackerToken";

/// Authenticator applies the token header to HTTP requests
#[derive(Debug, Clone)]
pub struct Authenticator {
    token: Option<TrackerToken>,
}

impl Authenticator {
    /// Create an authenticator for the given token
    pub fn new(token: TrackerToken) -> Self {
        Self { token: Some(token) }
    }

    /// Create an authenticator that leaves requests untouched
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Check whether a token will be sent
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.header(TOKEN_HEADER, token.expose()),
            None => req,
        }
    }
}

impl From<Option<TrackerToken>> for Authenticator {
    fn from(token: Option<TrackerToken>) -> Self {
        Self { token }
    }
}

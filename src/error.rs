//! Error types for the Tracker API client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structured error payload returned by the Tracker API on non-2xx responses
/// and inside failed aggregator fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code (e.g. "unfound_resource")
    #[serde(default)]
    pub code: String,
    /// Always "error" for error payloads
    #[serde(default)]
    pub kind: String,
    /// Human-readable summary
    #[serde(default)]
    pub error: String,
    /// Requirement that was not met, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<String>,
    /// General description of the problem
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_problem: Option<String>,
    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_fix: Option<String>,
    /// Per-field validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_errors: Vec<ValidationError>,
}

/// A single field validation failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Offending field name
    #[serde(default)]
    pub field: String,
    /// What was wrong with it
    #[serde(default)]
    pub problem: String,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.code)?;
        if let Some(problem) = &self.general_problem {
            write!(f, ": {problem}")?;
        }
        Ok(())
    }
}

/// The main error type for the Tracker API client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Transport / API Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {}", describe_api_error(.error.as_ref()))]
    Api {
        status: u16,
        error: Option<ApiErrorBody>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Response did not carry a pagination total")]
    MissingPaginationTotal,

    // ============================================================================
    // Lookup Errors
    // ============================================================================
    #[error("No result for {key}")]
    NotFound { key: String },

    #[error("Aggregated request {key} failed: {error}")]
    Fragment { key: String, error: ApiErrorBody },

    #[error("Correlation error: {message}")]
    Correlation { message: String },

    #[error("'{0}' is not a valid sort_order")]
    InvalidSortOrder(String),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_api_error(body: Option<&ApiErrorBody>) -> String {
    body.map_or_else(|| "no error body".to_string(), ToString::to_string)
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an API status error
    pub fn api(status: u16, error: Option<ApiErrorBody>) -> Self {
        Self::Api { status, error }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a correlation error
    pub fn correlation(message: impl Into<String>) -> Self {
        Self::Correlation {
            message: message.into(),
        }
    }

    /// Create an error for a failed aggregator fragment
    pub fn fragment(key: impl Into<String>, error: ApiErrorBody) -> Self {
        Self::Fragment {
            key: key.into(),
            error,
        }
    }

    /// Check if this is a lookup miss rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this error came from decoding a payload
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Json(_) | Error::Decode { .. })
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for the Tracker API client
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("token");
        assert_eq!(err.to_string(), "Missing required config field: token");

        let err = Error::api(404, None);
        assert_eq!(err.to_string(), "API error 404: no error body");

        let err = Error::not_found("/services/v5/stories/1");
        assert_eq!(err.to_string(), "No result for /services/v5/stories/1");
    }

    #[test]
    fn test_api_error_display_with_body() {
        let body = ApiErrorBody {
            code: "unfound_resource".to_string(),
            kind: "error".to_string(),
            error: "The object you tried to access could not be found.".to_string(),
            general_problem: Some("story 99 does not exist".to_string()),
            ..Default::default()
        };
        let err = Error::api(404, Some(body));
        assert_eq!(
            err.to_string(),
            "API error 404: The object you tried to access could not be found. \
             (unfound_resource): story 99 does not exist"
        );
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::not_found("x").is_not_found());
        assert!(!Error::decode("x").is_not_found());
        assert!(Error::decode("x").is_decode());
        assert!(!Error::api(500, None).is_decode());
        assert_eq!(Error::config("x").status(), None);
    }

    #[test]
    fn test_api_error_body_deserializes_partial_payload() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"kind":"error","code":"invalid_authentication","error":"Invalid authentication credentials were presented."}"#,
        )
        .unwrap();
        assert_eq!(body.code, "invalid_authentication");
        assert!(body.validation_errors.is_empty());
        assert!(body.possible_fix.is_none());
    }
}

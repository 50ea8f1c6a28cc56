//! Client configuration
//!
//! Configuration is layered: built-in defaults, then an optional YAML file,
//! then `TRACKER_*` environment variables. The result is validated before a
//! client is built from it.

use crate::auth::TrackerToken;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API root. The trailing slash is significant for URL resolution.
pub const DEFAULT_BASE_URL: &str = "https://www.pivotaltracker.com/services/v5/";

/// Items fetched per page when iterating lazily
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sub-requests per aggregator call. Found by experiment, not documented by
/// the server; larger batches risk being truncated.
pub const DEFAULT_BATCH_SIZE: usize = 15;

/// Environment variable names
pub mod env {
    pub const TOKEN: &str = "TRACKER_API_TOKEN";
    pub const BASE_URL: &str = "TRACKER_BASE_URL";
    pub const AGGREGATOR_URL: &str = "TRACKER_AGGREGATOR_URL";
    pub const PAGE_SIZE: &str = "TRACKER_PAGE_SIZE";
    pub const BATCH_SIZE: &str = "TRACKER_BATCH_SIZE";
}

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, must end with `/`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bulk aggregator endpoint (defaults to `<base_url>aggregator`)
    #[serde(default)]
    pub aggregator_url: Option<String>,

    /// API token sent as `X-TrackerToken`
    #[serde(default)]
    pub token: Option<TrackerToken>,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size for lazy iteration
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Maximum sub-requests per aggregator call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("tracker-api/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            aggregator_url: None,
            token: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            batch_size: default_batch_size(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Load defaults or the given file, apply the process environment, and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup function
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(env::TOKEN) {
            self.token = Some(TrackerToken::new(token));
        }
        if let Some(url) = lookup(env::BASE_URL) {
            self.base_url = url;
        }
        if let Some(url) = lookup(env::AGGREGATOR_URL) {
            self.aggregator_url = Some(url);
        }
        if let Some(value) = lookup(env::PAGE_SIZE) {
            self.page_size = value
                .parse()
                .map_err(|_| Error::invalid_value("page_size", format!("not a number: {value}")))?;
        }
        if let Some(value) = lookup(env::BATCH_SIZE) {
            self.batch_size = value
                .parse()
                .map_err(|_| Error::invalid_value("batch_size", format!("not a number: {value}")))?;
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url()?;
        if !base.path().ends_with('/') {
            return Err(Error::invalid_value("base_url", "trailing slash missing"));
        }
        self.aggregator_url()?;
        if self.batch_size == 0 {
            return Err(Error::invalid_value("batch_size", "must be at least 1"));
        }
        if self.token.as_ref().map_or(true, TrackerToken::is_empty) {
            return Err(Error::missing_field("token"));
        }
        Ok(())
    }

    /// Parsed API root
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    /// Parsed aggregator endpoint
    pub fn aggregator_url(&self) -> Result<Url> {
        match &self.aggregator_url {
            Some(url) => Ok(Url::parse(url)?),
            None => Ok(self.base_url()?.join("aggregator")?),
        }
    }

    /// Absolute path prefix of the API root (e.g. `/services/v5`).
    ///
    /// Aggregator sub-requests are addressed by absolute path, so they are
    /// built on this prefix rather than on the full base URL.
    pub fn api_path_prefix(&self) -> Result<String> {
        let base = self.base_url()?;
        Ok(base.path().trim_end_matches('/').to_string())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API root
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the aggregator endpoint
    pub fn aggregator_url(mut self, url: impl Into<String>) -> Self {
        self.config.aggregator_url = Some(url.into());
        self
    }

    /// Set the API token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(TrackerToken::new(token));
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs();
        self
    }

    /// Set the lazy iteration page size
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    /// Set the aggregator batch size
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

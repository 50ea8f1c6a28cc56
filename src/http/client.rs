//! reqwest-backed transport
//!
//! Resolves request paths against the API root, applies the auth header,
//! and maps error statuses to `Error::Api`.

use super::transport::{api_error, ApiRequest, ApiResponse, Transport};
use crate::auth::Authenticator;
use crate::config::ClientConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client for the Tracker API
pub struct HttpClient {
    client: Client,
    base_url: Url,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Create a client from a validated configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            authenticator: Authenticator::from(config.token.clone()),
        })
    }

    /// Create an unauthenticated client rooted at `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            authenticator: Authenticator::anonymous(),
        })
    }

    /// Replace the authenticator
    #[must_use]
    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = authenticator;
        self
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// API root every relative path is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a request path to a full URL
    ///
    /// Absolute URLs pass through; anything else is resolved as a URL
    /// reference against the API root, so `projects/1` lands under it and
    /// `/services/v5/aggregator` replaces its path.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Ok(Url::parse(path)?);
        }
        Ok(self.base_url.join(path)?)
    }

    /// Make a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.issue(ApiRequest::get(path)).await?.json()
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn issue(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.resolve(&request.path)?;
        debug!(method = %request.method, url = %url, query = ?request.query, "Issuing request");

        let mut req = self
            .client
            .request(request.method.into(), url.clone())
            .header(CONTENT_TYPE, "application/json");

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }

        if let Some(ref body) = request.body {
            req = req.json(body);
        }

        req = self.authenticator.apply(req);

        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if status > 299 {
            debug!(status, url = %url, "Request failed");
            return Err(api_error(status, &body));
        }

        debug!(status, url = %url, bytes = body.len(), "Request succeeded");
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_token", &self.authenticator.has_token())
            .finish_non_exhaustive()
    }
}

//! HTTP client for the Dragon Ball API
//!
//! A thin typed GET client: build the URL from the configured base, attach
//! query parameters, decode JSON, and map failures into [`ApiError`].

use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::{ApiError, Result};

/// Default base URL of the public Dragon Ball API
pub const DEFAULT_BASE_URL: &str = "https://dragonball-api.com/api";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base service URL (e.g., "https://dragonball-api.com/api")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("DragonBallBrowser/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiClientConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Typed HTTP client for the Dragon Ball API
///
/// # Examples
/// ```no_run
/// use dragonball_api::{ApiClient, ApiClientConfig, Character, Page};
///
/// async fn example() -> dragonball_api::Result<()> {
///     let client = ApiClient::new(ApiClientConfig::default());
///     let page: Page<Character> = client
///         .get_json("/characters", &[("page", "1".to_string()), ("limit", "10".to_string())])
///         .await?;
///     println!("{} characters", page.items.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: ReqwestClient,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ApiClientConfig) -> Self {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, config }
    }

    /// GET `path` (relative to the base URL) and decode the JSON body
    ///
    /// Each call is a single request; failures surface immediately. Callers
    /// that want another attempt reissue the request (the app's refresh).
    pub async fn get_json<T>(&self, path: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%url, "GET");

        let mut req = self.client.get(&url);
        for (key, value) in params {
            req = req.query(&[(key, value)]);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(ApiError::Api { status: status.as_u16(), message });
        }

        let data = serde_json::from_str(&body)?;
        Ok(data)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

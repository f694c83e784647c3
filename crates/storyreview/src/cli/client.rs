//! HTTP client for the story review REST API
//!
//! A thin wrapper so the CLI can talk to a local or remote review server.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::server::types::{ErrorResponse, HealthResponse, ReviewResponse, SearchRequest};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Shown when the server fails without telling us why
pub const GENERIC_FAILURE: &str = "Failed to fetch related stories";

/// Configuration for the review HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the review server (e.g., "http://localhost:5000")
  pub base_url: String,
  /// Request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self { base_url: DEFAULT_SERVER_URL.to_string(), timeout_secs: DEFAULT_TIMEOUT_SECS }
  }
}

/// Anything that can review a story; the session drives it
#[async_trait]
pub trait ReviewApi: Send + Sync {
  async fn review(&self, user_story: &str) -> Result<ReviewResponse>;
}

/// HTTP client for the review REST API
pub struct ReviewClient {
  client: Client,
  config: ClientConfig,
}

impl ReviewClient {
  /// Create a new client with custom configuration
  pub fn with_config(config: ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// Check that the server is up
  pub async fn health_check(&self) -> Result<HealthResponse> {
    let response = self
      .client
      .get(self.url("/health"))
      .timeout(Duration::from_secs(5))
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(anyhow!("Server health check failed: {}", response.status()));
    }

    Ok(response.json().await?)
  }
}

#[async_trait]
impl ReviewApi for ReviewClient {
  async fn review(&self, user_story: &str) -> Result<ReviewResponse> {
    let request = SearchRequest { user_story: Some(user_story.to_string()) };
    let response = self.client.post(self.url("/search")).json(&request).send().await?;

    if !response.status().is_success() {
      let message = response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_else(|_| GENERIC_FAILURE.to_string());
      return Err(anyhow!(message));
    }

    Ok(response.json().await?)
  }
}

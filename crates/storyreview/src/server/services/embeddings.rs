//! Embedding client for the hosted embeddings API
//!
//! Sends `{ input, model }` with bearer auth and reads the vector at
//! `data[0].embedding`. Failures are surfaced to the caller untouched; there is
//! no retry.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::server::config::ServerConfig;
use crate::server::error::{provider_payload, ReviewError};

pub const EMBEDDING_MODEL: &str = "mistral-embed";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
  input: &'a str,
  model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
  data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
  embedding: Vec<f32>,
}

/// Turns free text into a vector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingService: Send + Sync {
  async fn embed(&self, text: &str) -> Result<Vec<f32>, ReviewError>;
}

/// Production client for the Mistral embeddings endpoint
pub struct MistralEmbeddingClient {
  client: Client,
  url: String,
  api_key: String,
}

impl MistralEmbeddingClient {
  pub fn new(config: &ServerConfig) -> Result<Self> {
    Ok(Self {
      client: Client::builder().build()?,
      url: config.embeddings_url.clone(),
      api_key: config.mistral_api_key.clone(),
    })
  }
}

#[async_trait]
impl EmbeddingService for MistralEmbeddingClient {
  async fn embed(&self, text: &str) -> Result<Vec<f32>, ReviewError> {
    let request = EmbeddingRequest { input: text, model: EMBEDDING_MODEL };

    let response = self
      .client
      .post(&self.url)
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| ReviewError::upstream(format!("Embedding request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(ReviewError::upstream_with_details(
        format!("Embedding request failed with status {status}"),
        provider_payload(&body),
      ));
    }

    let parsed: EmbeddingResponse = response
      .json()
      .await
      .map_err(|e| ReviewError::upstream(format!("Invalid embedding response: {e}")))?;

    parsed
      .data
      .into_iter()
      .next()
      .map(|data| data.embedding)
      .ok_or_else(|| ReviewError::upstream("Embedding response contained no vectors"))
  }
}

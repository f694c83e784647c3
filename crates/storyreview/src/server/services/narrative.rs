//! Narrative generation through the chat completions API
//!
//! Renders the review prompt from the submitted story and its closest
//! neighbors, asks the model for a review in the shared layout, and falls back
//! to the canned review when anything about the call goes wrong.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use super::review_format::{criteria_checklist, fallback_review, ReviewReport, CRITERIA, CRITERION_MAX};
use crate::server::config::ServerConfig;
use crate::server::error::provider_payload;
use crate::server::models::story::StoryContext;

pub const CHAT_MODEL: &str = "openai/gpt-oss-120b";
pub const SYSTEM_INSTRUCTION: &str = "You are a senior healthcare business analyst. You ALWAYS respond \
                                      with exactly the requested format. Be concise and structured.";
pub const MAX_TOKENS: u32 = 1024;
pub const TEMPERATURE: f32 = 0.1;
pub const TOP_P: f32 = 0.9;
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Related stories shown to the model, regardless of how many were found
pub const MAX_CONTEXT_STORIES: usize = 3;

/// Why a generation attempt was abandoned. Only ever logged.
#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("Chat request timed out after {0:?}")]
  Timeout(Duration),

  #[error("Chat request failed: {0}")]
  Transport(#[source] reqwest::Error),

  #[error("Chat request failed with status {status}")]
  Status { status: StatusCode, payload: Value },

  #[error("Invalid chat response: {0}")]
  Malformed(#[source] reqwest::Error),

  #[error("No response from chat completions API")]
  EmptyResponse,
}

impl GenerationError {
  pub fn payload(&self) -> Option<&Value> {
    match self {
      Self::Status { payload, .. } => Some(payload),
      _ => None,
    }
  }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: [ChatMessage<'a>; 2],
  max_tokens: u32,
  temperature: f32,
  top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
  message: Option<ChatReply>,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
  content: Option<String>,
}

/// Produces the review text for a story
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarrativeService: Send + Sync {
  /// Always yields review text; failures resolve to the fallback review
  async fn review(&self, user_story: &str, related: &[StoryContext]) -> String;
}

/// Render the fixed review prompt. Only the first three related stories are included.
pub fn render_prompt(user_story: &str, related: &[StoryContext]) -> String {
  let context: Vec<&StoryContext> = related.iter().take(MAX_CONTEXT_STORIES).collect();
  let snapshot = serde_json::to_string_pretty(&context).unwrap_or_else(|_| "[]".to_string());

  format!(
    "CRITICAL: You MUST format your response EXACTLY as specified below. Do not deviate from this structure.

**USER STORY TO ANALYZE:**
\"{user_story}\"

**ANALYSIS REQUIREMENTS:**
Evaluate this healthcare user story against these {count} parameters (each scored out of {max}):

{checklist}

**RELATED STORIES FOR CONTEXT:**
{snapshot}

**RESPONSE FORMAT - FOLLOW EXACTLY:**

{template}
",
    count = CRITERIA.len(),
    max = CRITERION_MAX,
    checklist = criteria_checklist(),
    template = ReviewReport::template().render(),
  )
}

/// Production generator backed by Groq's OpenAI-compatible endpoint
pub struct GroqNarrativeGenerator {
  client: Client,
  url: String,
  api_key: String,
  timeout: Duration,
}

impl GroqNarrativeGenerator {
  pub fn new(config: &ServerConfig) -> Result<Self> {
    Ok(Self {
      client: Client::builder().build()?,
      url: config.chat_url.clone(),
      api_key: config.groq_api_key.clone(),
      timeout: GENERATION_TIMEOUT,
    })
  }

  /// Override the wait bound on the chat call
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  /// One chat completion round-trip, returning the first choice's text
  pub async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
    let request = ChatRequest {
      model: CHAT_MODEL,
      messages: [
        ChatMessage { role: "system", content: SYSTEM_INSTRUCTION },
        ChatMessage { role: "user", content: prompt },
      ],
      max_tokens: MAX_TOKENS,
      temperature: TEMPERATURE,
      top_p: TOP_P,
    };

    let response = self
      .client
      .post(&self.url)
      .bearer_auth(&self.api_key)
      .timeout(self.timeout)
      .json(&request)
      .send()
      .await
      .map_err(|e| self.classify(e))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(GenerationError::Status { status, payload: provider_payload(&body) });
    }

    let parsed: ChatResponse = response.json().await.map_err(|e| {
      if e.is_timeout() {
        GenerationError::Timeout(self.timeout)
      } else {
        GenerationError::Malformed(e)
      }
    })?;

    parsed
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message)
      .and_then(|message| message.content)
      .ok_or(GenerationError::EmptyResponse)
  }

  fn classify(&self, error: reqwest::Error) -> GenerationError {
    if error.is_timeout() {
      GenerationError::Timeout(self.timeout)
    } else {
      GenerationError::Transport(error)
    }
  }
}

#[async_trait]
impl NarrativeService for GroqNarrativeGenerator {
  async fn review(&self, user_story: &str, related: &[StoryContext]) -> String {
    let prompt = render_prompt(user_story, related);

    match self.complete(&prompt).await {
      Ok(text) => text,
      Err(error) => {
        tracing::warn!(
          error = %error,
          payload = ?error.payload(),
          "review generation failed, answering with fallback review"
        );
        fallback_review()
      }
    }
  }
}

//! REST API types with schemars annotations for OpenAPI generation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::server::models::story::ProjectedStory;

// Review Endpoint
// ===============

/// Request body for POST /search
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
  /// Free text of the user story to review
  #[serde(default)]
  pub user_story: Option<String>,
}

impl SearchRequest {
  /// The submitted story, if it holds anything besides whitespace
  pub fn story(&self) -> Option<&str> {
    self.user_story.as_deref().filter(|story| !story.trim().is_empty())
  }
}

/// Response body for POST /search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
  /// Structured review text, passed through verbatim
  pub review_summary: String,

  /// Nearest stored stories, most similar first
  pub related_stories: Vec<ProjectedStory>,
}

// Errors
// ======

/// Body of every 4xx/5xx response
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
  /// Human readable error message
  pub error: String,

  /// Provider payload attached to upstream failures
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub details: Option<serde_json::Value>,
}

// Health Endpoint
// ===============

/// Response body for GET /health
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
  pub status: String,

  /// ISO 8601 timestamp in UTC with millisecond precision
  pub timestamp: String,
}

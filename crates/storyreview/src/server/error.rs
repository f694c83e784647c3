//! Error types surfaced by the review endpoint

use axum::{
  http::StatusCode,
  response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use thiserror::Error;

use crate::server::types::ErrorResponse;

pub const MISSING_USER_STORY: &str = "userStory required";

/// Failures that terminate a review request with an error response.
///
/// Generation failures never show up here; the narrative generator absorbs
/// them and answers with the fallback review instead.
#[derive(Debug, Error)]
pub enum ReviewError {
  #[error("userStory required")]
  MissingUserStory,

  /// Embedding or vector search failure, with the provider payload if one came back
  #[error("{message}")]
  Upstream { message: String, details: Option<Value> },
}

impl ReviewError {
  pub fn upstream(message: impl Into<String>) -> Self {
    Self::Upstream { message: message.into(), details: None }
  }

  pub fn upstream_with_details(message: impl Into<String>, details: Value) -> Self {
    Self::Upstream { message: message.into(), details: Some(details) }
  }

  pub fn status_code(&self) -> StatusCode {
    match self {
      Self::MissingUserStory => StatusCode::BAD_REQUEST,
      Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  pub fn details(&self) -> Option<&Value> {
    match self {
      Self::MissingUserStory => None,
      Self::Upstream { details, .. } => details.as_ref(),
    }
  }
}

impl From<mongodb::error::Error> for ReviewError {
  fn from(error: mongodb::error::Error) -> Self {
    Self::upstream(error.to_string())
  }
}

impl IntoResponse for ReviewError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    let body = ErrorResponse { error: self.to_string(), details: self.details().cloned() };
    (status, Json(body)).into_response()
  }
}

/// Parse a provider error body, keeping it as a plain string when it isn't JSON
pub fn provider_payload(body: &str) -> Value {
  serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

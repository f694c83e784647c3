//! Review endpoint handler
//!
//! A request moves through `Validating` and then either `Rejected` (no usable
//! story) or `Processing`, which ends in `Responded` or `Failed`. Processing is
//! strictly sequential: embed, search, project, generate.

use axum::{
  extract::{rejection::JsonRejection, Extension, Json, State},
  response::Json as ResponseJson,
};
use std::fmt;

use crate::server::error::ReviewError;
use crate::server::middleware::RequestContext;
use crate::server::models::story::{project, StoryContext};
use crate::server::services::narrative::MAX_CONTEXT_STORIES;
use crate::server::state::AppState;
use crate::server::types::{ReviewResponse, SearchRequest};

const COMPONENT: &str = "review-api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
  Validating,
  Processing,
  Responded,
  Rejected,
  Failed,
}

impl fmt::Display for RequestPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Validating => "validating",
      Self::Processing => "processing",
      Self::Responded => "responded",
      Self::Rejected => "rejected",
      Self::Failed => "failed",
    };
    f.write_str(name)
  }
}

/// POST /search - Review a user story against its nearest stored neighbors
pub async fn search(
  State(state): State<AppState>,
  Extension(context): Extension<RequestContext>,
  payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<ResponseJson<ReviewResponse>, ReviewError> {
  context.log_info(&format!("phase: {}", RequestPhase::Validating), COMPONENT);

  let request = match payload {
    Ok(Json(request)) => request,
    Err(rejection) => {
      context.log_warn(&format!("unreadable request body: {rejection}"), COMPONENT);
      SearchRequest::default()
    }
  };

  let Some(story) = request.story() else {
    context.log_warn(&format!("phase: {}, userStory missing", RequestPhase::Rejected), COMPONENT);
    return Err(ReviewError::MissingUserStory);
  };

  context.log_info(&format!("phase: {}", RequestPhase::Processing), COMPONENT);

  match review_story(&state, story).await {
    Ok(response) => {
      context.log_info(
        &format!(
          "phase: {}, {} related stories",
          RequestPhase::Responded,
          response.related_stories.len()
        ),
        COMPONENT,
      );
      Ok(ResponseJson(response))
    }
    Err(error) => {
      context.log_error(
        &format!("phase: {}, {error} (details: {:?})", RequestPhase::Failed, error.details()),
        COMPONENT,
      );
      Err(error)
    }
  }
}

/// Run the embed, search, project and generate chain for one story
pub async fn review_story(state: &AppState, story: &str) -> Result<ReviewResponse, ReviewError> {
  let embedding = state.embeddings.embed(story).await?;
  let records = state.vectors.search_similar(&embedding, state.neighbors).await?;

  let related_stories = project(&records);
  let context: Vec<StoryContext> =
    records.iter().take(MAX_CONTEXT_STORIES).map(StoryContext::from).collect();

  let review_summary = state.narrator.review(story, &context).await;

  Ok(ReviewResponse { review_summary, related_stories })
}

//! Review session state for the terminal client
//!
//! Mirrors a single form: one story, one submission at a time, and the last
//! outcome kept until the next submission clears it.

use anyhow::Result;

use crate::cli::client::ReviewApi;
use crate::server::types::ReviewResponse;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
  Idle,
  Loading,
  Success(ReviewResponse),
  Error(String),
}

#[derive(Debug)]
pub struct ReviewSession {
  user_story: String,
  state: ViewState,
}

impl Default for ReviewSession {
  fn default() -> Self {
    Self::new()
  }
}

impl ReviewSession {
  pub fn new() -> Self {
    Self { user_story: String::new(), state: ViewState::Idle }
  }

  pub fn set_user_story(&mut self, story: impl Into<String>) {
    self.user_story = story.into();
  }

  pub fn user_story(&self) -> &str {
    &self.user_story
  }

  pub fn state(&self) -> &ViewState {
    &self.state
  }

  pub fn is_loading(&self) -> bool {
    matches!(self.state, ViewState::Loading)
  }

  /// Submission is refused while a request is in flight or the story is blank
  pub fn can_submit(&self) -> bool {
    !self.is_loading() && !self.user_story.trim().is_empty()
  }

  /// Enter `Loading`, dropping any previous result or error
  pub fn begin(&mut self) -> bool {
    if !self.can_submit() {
      return false;
    }
    self.state = ViewState::Loading;
    true
  }

  pub fn finish(&mut self, outcome: Result<ReviewResponse>) {
    self.state = match outcome {
      Ok(response) => ViewState::Success(response),
      Err(error) => ViewState::Error(error.to_string()),
    };
  }

  /// Send the current story and record the outcome
  pub async fn submit<A: ReviewApi + ?Sized>(&mut self, api: &A) -> &ViewState {
    if self.begin() {
      let outcome = api.review(&self.user_story).await;
      self.finish(outcome);
    }
    &self.state
  }
}

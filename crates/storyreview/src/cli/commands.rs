use anyhow::{anyhow, Context, Result};
use colored::*;
use std::io::Read;
use std::path::Path;

use crate::cli::client::ReviewClient;
use crate::cli::display::render_review;
use crate::cli::session::{ReviewSession, ViewState};

/// Pick the story from the argument, a file, or stdin, in that order
pub fn read_story(story: Option<String>, file: Option<&Path>) -> Result<String> {
  if let Some(story) = story {
    return Ok(story);
  }

  if let Some(path) = file {
    return std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read story from {}", path.display()));
  }

  let mut buffer = String::new();
  std::io::stdin().read_to_string(&mut buffer).context("Failed to read story from stdin")?;
  Ok(buffer)
}

/// Submit a story for review and print the outcome
pub async fn review(client: &ReviewClient, story: String) -> Result<()> {
  let mut session = ReviewSession::new();
  session.set_user_story(story);

  if !session.can_submit() {
    return Err(anyhow!("Enter a user story to analyze"));
  }

  eprintln!("{}", "Fetching...".dimmed());

  match session.submit(client).await {
    ViewState::Success(response) => {
      println!("{}", render_review(response));
      Ok(())
    }
    ViewState::Error(message) => Err(anyhow!(message.clone())),
    ViewState::Idle | ViewState::Loading => Err(anyhow!("Review was not submitted")),
  }
}

/// Report whether the server is reachable
pub async fn health(client: &ReviewClient) -> Result<()> {
  let health = client.health_check().await?;
  println!("{} Server status: {} ({})", "✓".green(), health.status.cyan(), health.timestamp);
  Ok(())
}

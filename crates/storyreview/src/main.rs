use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use storyreview::cli::client::{ClientConfig, ReviewClient, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS};
use storyreview::cli::commands;
use storyreview::cli::display::render_error;

#[derive(Parser)]
#[command(name = "storyreview")]
#[command(
  about = "Storyreview - Healthcare User Story Analysis\nScores a user story and lists similar stories from the backlog"
)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
struct Cli {
  /// Base URL of the review server
  #[arg(long, global = true, env = "STORY_REVIEW_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
  server: String,

  /// Request timeout in seconds
  #[arg(long, global = true, env = "STORY_REVIEW_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
  timeout: u64,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Analyze a user story (reads stdin when no story or file is given)
  Review {
    /// The user story text
    story: Option<String>,
    /// Read the user story from a file
    #[arg(short, long, conflicts_with = "story")]
    file: Option<PathBuf>,
  },
  /// Check that the review server is up
  Health,
}

async fn handle(cli: Cli) -> Result<()> {
  let client = ReviewClient::with_config(ClientConfig { base_url: cli.server, timeout_secs: cli.timeout })?;

  match cli.command {
    Command::Review { story, file } => {
      let story = commands::read_story(story, file.as_deref())?;
      commands::review(&client, story).await
    }
    Command::Health => commands::health(&client).await,
  }
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();

  if let Err(error) = handle(cli).await {
    eprintln!("{}", render_error(&format!("{error:#}")));
    std::process::exit(1);
  }
}

//! Storyreview REST Server
//!
//! Serves `POST /search` and `GET /health`. Configuration comes from flags,
//! the environment, or a `.env` file in the working directory.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use storyreview::server::config::ServerConfig;
use storyreview::server::startup::start_server;

#[derive(Parser)]
#[command(name = "storyreview_server")]
#[command(about = "Storyreview REST API Server")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
struct Args {
  #[command(flatten)]
  config: ServerConfig,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  // Must run before parsing so .env values feed the env-backed flags
  dotenvy::dotenv().ok();

  let args = Args::parse();

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if args.verbose {
      EnvFilter::new("debug,hyper=info,mongodb=info,reqwest=info")
    } else {
      EnvFilter::new("storyreview=info,storyreview_server=info,tower_http=warn,mongodb=warn,warn")
    }
  });

  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  tracing::info!("Starting Storyreview REST Server v{}", env!("CARGO_PKG_VERSION"));

  start_server(args.config).await
}

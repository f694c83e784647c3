//! REST server startup and configuration

use anyhow::{anyhow, Result};
use axum::serve;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::config::ServerConfig;
use crate::server::routing::create_router;
use crate::server::state::AppState;

/// Connect the external clients and serve until the process is stopped
pub async fn start_server(config: ServerConfig) -> Result<()> {
  let addr = config.bind_addr();
  tracing::info!(
    %addr,
    db = %config.db_name,
    collection = %config.collection_name,
    index = %config.index_name,
    neighbors = config.neighbors,
    "starting story review server"
  );

  if config.mistral_api_key.is_empty() {
    tracing::warn!("MISTRAL_API_KEY is not set; embedding requests will be rejected");
  }
  if config.groq_api_key.is_empty() {
    tracing::warn!("GROQ_API_KEY is not set; every review will use the fallback text");
  }

  let state = AppState::from_config(&config).await?;

  let app = create_router(state)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await?;
  tracing::info!(%addr, "server listening");

  serve(listener, app).await.map_err(|e| anyhow!("Server error: {}", e))?;

  tracing::info!("server shut down");
  Ok(())
}

//! Shared per-process state handed to every handler

use anyhow::Result;
use std::sync::Arc;

use crate::server::config::ServerConfig;
use crate::server::services::atlas::AtlasVectorStore;
use crate::server::services::embeddings::{EmbeddingService, MistralEmbeddingClient};
use crate::server::services::narrative::{GroqNarrativeGenerator, NarrativeService};
use crate::server::services::vector_database::VectorDatabase;

#[derive(Clone)]
pub struct AppState {
  pub embeddings: Arc<dyn EmbeddingService>,
  pub vectors: Arc<dyn VectorDatabase>,
  pub narrator: Arc<dyn NarrativeService>,
  /// Related stories requested per review (k)
  pub neighbors: usize,
}

impl AppState {
  pub fn new(
    embeddings: Arc<dyn EmbeddingService>,
    vectors: Arc<dyn VectorDatabase>,
    narrator: Arc<dyn NarrativeService>,
    neighbors: usize,
  ) -> Self {
    Self { embeddings, vectors, narrator, neighbors }
  }

  /// Build the production clients described by `config`
  pub async fn from_config(config: &ServerConfig) -> Result<Self> {
    let embeddings = MistralEmbeddingClient::new(config)?;
    let vectors = AtlasVectorStore::connect(config).await?;
    let narrator = GroqNarrativeGenerator::new(config)?;

    Ok(Self::new(Arc::new(embeddings), Arc::new(vectors), Arc::new(narrator), config.neighbors))
  }
}

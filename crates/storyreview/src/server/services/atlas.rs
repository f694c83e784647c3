//! MongoDB Atlas vector search
//!
//! The driver's `Client` is a connection pool; one is opened at startup and
//! shared by every request.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, from_document, Document};
use mongodb::{Client, Collection};

use super::vector_database::VectorDatabase;
use crate::server::config::ServerConfig;
use crate::server::error::ReviewError;
use crate::server::models::story::StoryRecord;

/// Candidates considered by the ANN search per requested result
pub const CANDIDATE_MULTIPLIER: usize = 5;

/// Document field holding each story's embedding
pub const EMBEDDING_PATH: &str = "embedding";

pub struct AtlasVectorStore {
  collection: Collection<Document>,
  index_name: String,
}

impl AtlasVectorStore {
  /// Open the connection pool and bind to the configured collection
  pub async fn connect(config: &ServerConfig) -> Result<Self> {
    let client = Client::with_uri_str(&config.mongodb_uri)
      .await
      .map_err(|e| anyhow!("Failed to connect to MongoDB: {}", e))?;

    Ok(Self::with_client(&client, config))
  }

  pub fn with_client(client: &Client, config: &ServerConfig) -> Self {
    let collection = client.database(&config.db_name).collection(&config.collection_name);
    Self { collection, index_name: config.index_name.clone() }
  }
}

/// Build the `$vectorSearch` aggregation for a query vector. Stored embeddings
/// are dropped from the hits since nothing downstream reads them.
pub fn vector_search_pipeline(index_name: &str, query_embedding: &[f32], limit: usize) -> Vec<Document> {
  let query_vector: Vec<f64> = query_embedding.iter().map(|v| f64::from(*v)).collect();
  let candidates = limit.saturating_mul(CANDIDATE_MULTIPLIER).min(i64::MAX as usize);

  vec![
    doc! {
      "$vectorSearch": {
        "index": index_name,
        "path": EMBEDDING_PATH,
        "queryVector": query_vector,
        "numCandidates": candidates as i64,
        "limit": limit.min(i64::MAX as usize) as i64,
      }
    },
    doc! { "$project": { EMBEDDING_PATH: 0 } },
  ]
}

/// Decode raw search hits into story records, keeping at most `limit`
pub fn decode_hits(documents: Vec<Document>, limit: usize) -> Result<Vec<StoryRecord>, ReviewError> {
  documents
    .into_iter()
    .take(limit)
    .map(|document| {
      from_document::<StoryRecord>(document)
        .map_err(|e| ReviewError::upstream(format!("Malformed story record: {e}")))
    })
    .collect()
}

#[async_trait]
impl VectorDatabase for AtlasVectorStore {
  async fn search_similar(
    &self,
    query_embedding: &[f32],
    limit: usize,
  ) -> Result<Vec<StoryRecord>, ReviewError> {
    let pipeline = vector_search_pipeline(&self.index_name, query_embedding, limit);

    let cursor = self.collection.aggregate(pipeline).await?;
    let documents: Vec<Document> = cursor.try_collect().await?;

    tracing::debug!(hits = documents.len(), limit, "vector search complete");

    decode_hits(documents, limit)
  }
}

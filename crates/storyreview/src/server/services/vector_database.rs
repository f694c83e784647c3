//! Vector database abstraction for related story lookup
//!
//! The handler only sees [`VectorDatabase`], so the Atlas implementation can be
//! swapped for a fake in tests or for another store later.

use async_trait::async_trait;

use crate::server::error::ReviewError;
use crate::server::models::story::StoryRecord;

/// Nearest-neighbor search over stored story embeddings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorDatabase: Send + Sync {
  /// Return up to `limit` stories, most similar first
  async fn search_similar(
    &self,
    query_embedding: &[f32],
    limit: usize,
  ) -> Result<Vec<StoryRecord>, ReviewError>;
}

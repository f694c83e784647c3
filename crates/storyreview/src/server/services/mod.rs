pub mod atlas;
pub mod embeddings;
pub mod narrative;
pub mod review_format;
pub mod vector_database;

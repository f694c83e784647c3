//! Server configuration
//!
//! Everything the service needs from its environment lives in [`ServerConfig`],
//! built once at startup and shared with each component. Values come from
//! command line flags or the matching environment variables.

use clap::builder::RangedU64ValueParser;
use clap::Args;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DB_NAME: &str = "rag_userstories";
pub const DEFAULT_COLLECTION_NAME: &str = "stories";
pub const DEFAULT_INDEX_NAME: &str = "atlas_search";
pub const DEFAULT_EMBEDDINGS_URL: &str = "https://api.mistral.ai/v1/embeddings";
pub const DEFAULT_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_NEIGHBORS: usize = 4;

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
  /// MongoDB connection string
  #[arg(long, env = "MONGODB_URI", default_value = DEFAULT_MONGODB_URI)]
  pub mongodb_uri: String,

  /// Database holding the story collection
  #[arg(long, env = "DB_NAME", default_value = DEFAULT_DB_NAME)]
  pub db_name: String,

  /// Collection holding story records and their embeddings
  #[arg(long, env = "COLLECTION_NAME", default_value = DEFAULT_COLLECTION_NAME)]
  pub collection_name: String,

  /// Name of the Atlas vector search index
  #[arg(long, env = "INDEX_TYPE", default_value = DEFAULT_INDEX_NAME)]
  pub index_name: String,

  /// Bearer token for the embeddings API
  #[arg(long, env = "MISTRAL_API_KEY", default_value = "", hide_env_values = true)]
  pub mistral_api_key: String,

  /// Bearer token for the chat completions API
  #[arg(long, env = "GROQ_API_KEY", default_value = "", hide_env_values = true)]
  pub groq_api_key: String,

  /// Embeddings endpoint
  #[arg(long, env = "MISTRAL_EMBEDDINGS_URL", default_value = DEFAULT_EMBEDDINGS_URL)]
  pub embeddings_url: String,

  /// Chat completions endpoint
  #[arg(long, env = "GROQ_API_URL", default_value = DEFAULT_CHAT_URL)]
  pub chat_url: String,

  /// Interface to listen on
  #[arg(long, env = "HOST", default_value = "0.0.0.0")]
  pub host: IpAddr,

  /// Port to listen on
  #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
  pub port: u16,

  /// Number of related stories returned per review (k), at least one
  #[arg(
    long,
    env = "RELATED_STORIES",
    default_value_t = DEFAULT_NEIGHBORS,
    value_parser = RangedU64ValueParser::<usize>::new().range(1..)
  )]
  pub neighbors: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      mongodb_uri: DEFAULT_MONGODB_URI.to_string(),
      db_name: DEFAULT_DB_NAME.to_string(),
      collection_name: DEFAULT_COLLECTION_NAME.to_string(),
      index_name: DEFAULT_INDEX_NAME.to_string(),
      mistral_api_key: String::new(),
      groq_api_key: String::new(),
      embeddings_url: DEFAULT_EMBEDDINGS_URL.to_string(),
      chat_url: DEFAULT_CHAT_URL.to_string(),
      host: IpAddr::from([0, 0, 0, 0]),
      port: DEFAULT_PORT,
      neighbors: DEFAULT_NEIGHBORS,
    }
  }
}

impl ServerConfig {
  pub fn bind_addr(&self) -> SocketAddr {
    SocketAddr::new(self.host, self.port)
  }
}

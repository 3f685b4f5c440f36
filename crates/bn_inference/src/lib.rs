use clap::Args;
use std::fmt;

pub mod embeddings;
pub mod models;

#[derive(Clone, Args)]
pub struct InferenceConfig {
    /// Embedding provider: openai, hash or none
    #[arg(long = "embedding-provider", env = "BN_EMBEDDING_PROVIDER", default_value = "hash")]
    pub provider: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long = "embedding-url", env = "BN_EMBEDDING_URL")]
    pub base_url: Option<String>,

    #[arg(long = "embedding-model", env = "BN_EMBEDDING_MODEL")]
    pub model_name: Option<String>,

    #[arg(long = "embedding-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long = "embedding-timeout", env = "BN_EMBEDDING_TIMEOUT_SECS", default_value_t = 20)]
    pub embedding_timeout_secs: u64,
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("embedding_timeout_secs", &self.embedding_timeout_secs)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: "hash".to_string(),
            base_url: None,
            model_name: None,
            api_key: None,
            embedding_timeout_secs: 20,
        }
    }
}

pub mod prelude {
    pub use super::embeddings::{EmbeddingGateway, Embeddings};
    pub use super::models::create_model;
    pub use super::InferenceConfig;
    pub use bn_core::{EmbeddingModel, Error, Result};
}

pub use embeddings::{EmbeddingGateway, Embeddings};
pub use models::create_model;

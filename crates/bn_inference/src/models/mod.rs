use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use bn_core::{EmbeddingModel, Error, Result};
use tracing::info;
use crate::InferenceConfig;

pub mod hash;
pub mod openai;

pub use hash::HashEmbeddingModel;
pub use openai::OpenAiEmbeddingModel;

/// Stand-in for a deployment without any embedding provider; every call
/// reports unavailability so clustering takes its fallback path.
#[derive(Debug, Default)]
pub struct DisabledModel;

#[async_trait]
impl EmbeddingModel for DisabledModel {
    fn name(&self) -> &str {
        "none"
    }

    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Inference("embeddings are disabled".to_string()))
    }
}

pub async fn create_model(config: &InferenceConfig) -> Result<Arc<dyn EmbeddingModel>> {
    let model: Arc<dyn EmbeddingModel> = match config.provider.to_lowercase().as_str() {
        "openai" => Arc::new(OpenAiEmbeddingModel::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model_name.clone(),
            Duration::from_secs(config.embedding_timeout_secs),
        )?),
        "hash" => Arc::new(HashEmbeddingModel::default()),
        "none" => Arc::new(DisabledModel),
        other => {
            return Err(Error::Config(format!(
                "Unknown embedding provider '{}'. Available providers: openai, hash, none",
                other
            )))
        }
    };
    info!("🧠 Embedding provider ready (using {})", model.name());
    Ok(model)
}

use async_trait::async_trait;
use std::fmt;
use crate::Result;

#[async_trait]
pub trait EmbeddingModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Embed a batch of texts, one vector per text, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

use std::path::PathBuf;
use async_trait::async_trait;
use bn_core::{RawItem, Result};
use super::FeedFetcher;

/// Raw items stored as a JSON array on disk, e.g. a captured feed dump.
#[derive(Debug, Clone)]
pub struct JsonFileFetcher {
    path: PathBuf,
    name: String,
}

impl JsonFileFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

#[async_trait]
impl FeedFetcher for JsonFileFetcher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<RawItem>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

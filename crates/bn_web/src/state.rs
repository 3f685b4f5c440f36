use std::sync::Arc;
use bn_core::{Cluster, SnapshotStore};
use bn_feeds::BoxedFetcher;
use bn_news::NewsPipeline;
use tokio::sync::RwLock;

/// Clusters already reported as breaking, kept across requests.
const MAX_RETAINED: usize = 50;

pub struct AppState {
    pub pipeline: NewsPipeline,
    pub fetchers: Vec<BoxedFetcher>,
    pub store: Arc<dyn SnapshotStore>,
    retained: RwLock<Vec<Cluster>>,
}

impl AppState {
    pub fn new(pipeline: NewsPipeline, fetchers: Vec<BoxedFetcher>, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            pipeline,
            fetchers,
            store,
            retained: RwLock::new(Vec::new()),
        }
    }

    pub async fn retained(&self) -> Vec<Cluster> {
        self.retained.read().await.clone()
    }

    /// Newly reported clusters go first; the oldest fall off past the cap.
    pub async fn remember(&self, reported: Vec<Cluster>, kept: Vec<Cluster>) {
        let mut retained = reported;
        retained.extend(kept);
        retained.truncate(MAX_RETAINED);
        *self.retained.write().await = retained;
    }
}

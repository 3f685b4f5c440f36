use async_trait::async_trait;
use bn_core::{RawItem, Result};
use futures::future::join_all;
use tracing::{info, warn};

pub mod file;
pub mod mock;
pub mod syndication;

pub use self::file::JsonFileFetcher;
pub use self::mock::MockFetcher;
pub use self::syndication::RssFetcher;

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Pull every raw record the source currently offers.
    async fn fetch(&self) -> Result<Vec<RawItem>>;
}

pub type BoxedFetcher = Box<dyn FeedFetcher>;

/// Run all fetchers concurrently and concatenate their records in fetcher
/// order. A failing fetcher contributes nothing.
pub async fn fetch_all(fetchers: &[BoxedFetcher]) -> Vec<RawItem> {
    let results = join_all(fetchers.iter().map(|f| f.fetch())).await;

    let mut items = Vec::new();
    let mut failed = 0;
    for (fetcher, result) in fetchers.iter().zip(results) {
        match result {
            Ok(batch) => items.extend(batch),
            Err(e) => {
                failed += 1;
                warn!("❌ Failed feed {}: {}", fetcher.name(), e);
            }
        }
    }

    info!("📥 Fetched {} records from {} feeds ({} failed)", items.len(), fetchers.len(), failed);
    items
}

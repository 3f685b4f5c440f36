use async_trait::async_trait;
use crate::types::HeadlineSnapshot;
use crate::Result;

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Headlines of the last event the caller reacted to, if any
    async fn latest(&self) -> Result<Option<HeadlineSnapshot>>;

    /// Replace the stored snapshot
    async fn save(&self, snapshot: &HeadlineSnapshot) -> Result<()>;
}

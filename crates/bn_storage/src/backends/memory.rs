use std::sync::Arc;
use async_trait::async_trait;
use bn_core::{HeadlineSnapshot, Result, SnapshotStore};
use tokio::sync::RwLock;

/// Process-local store; the snapshot is lost on exit.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    current: Arc<RwLock<Option<HeadlineSnapshot>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn latest(&self) -> Result<Option<HeadlineSnapshot>> {
        Ok(self.current.read().await.clone())
    }

    async fn save(&self, snapshot: &HeadlineSnapshot) -> Result<()> {
        *self.current.write().await = Some(snapshot.clone());
        Ok(())
    }
}

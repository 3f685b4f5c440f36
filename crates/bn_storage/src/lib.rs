use std::path::PathBuf;
use std::sync::Arc;
use bn_core::{Error, Result, SnapshotStore};
use clap::Args;
use tracing::info;

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Snapshot store backend: memory or sqlite
    #[arg(long = "store", env = "BN_STORE", default_value = "memory")]
    pub kind: String,

    /// Database file for the sqlite backend
    #[arg(long = "store-path", env = "BN_STORE_PATH", default_value = "headlines.db")]
    pub path: PathBuf,
}

impl Default for StoreArgs {
    fn default() -> Self {
        Self {
            kind: "memory".to_string(),
            path: PathBuf::from("headlines.db"),
        }
    }
}

impl StoreArgs {
    pub async fn open(&self) -> Result<Arc<dyn SnapshotStore>> {
        create_store(&self.kind, &self.path).await
    }
}

pub async fn create_store(kind: &str, path: &std::path::Path) -> Result<Arc<dyn SnapshotStore>> {
    let store: Arc<dyn SnapshotStore> = match kind.to_lowercase().as_str() {
        "memory" => Arc::new(MemorySnapshotStore::new()),
        #[cfg(feature = "sqlite")]
        "sqlite" => Arc::new(SqliteSnapshotStore::new_with_path(path).await?),
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => {
            return Err(Error::Config(format!(
                "cannot open {}: sqlite support was not compiled in",
                path.display()
            )))
        }
        other => return Err(Error::Config(format!("Unknown snapshot store: {}", other))),
    };
    info!("💾 Snapshot store: {}", kind);
    Ok(store)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_store, StoreArgs};
}

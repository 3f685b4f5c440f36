pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemorySnapshotStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSnapshotStore;

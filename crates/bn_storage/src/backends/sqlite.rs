use std::path::{Path, PathBuf};
use async_trait::async_trait;
use bn_core::{Error, HeadlineSnapshot, Result, SnapshotStore};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePool}, Row};
use tracing::debug;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS headline_snapshots (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recorded_at TEXT NOT NULL,
        titles TEXT NOT NULL,
        cluster_title TEXT
    )
    "#,
];

/// Snapshots appended to a SQLite table; the newest row is the current one.
#[derive(Debug, Clone)]
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
    db_path: PathBuf,
}

impl SqliteSnapshotStore {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new().filename(db_path).create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("Failed to open {}: {}", db_path.display(), e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("Failed to run migration {}: {}", i, e)))?;
        }
        debug!("💾 Snapshot database ready at {}", db_path.display());

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn latest(&self) -> Result<Option<HeadlineSnapshot>> {
        let row = sqlx::query(
            "SELECT recorded_at, titles, cluster_title FROM headline_snapshots ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("Failed to load snapshot: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let recorded_at: String = row.try_get("recorded_at").map_err(|e| Error::Storage(e.to_string()))?;
        let titles: String = row.try_get("titles").map_err(|e| Error::Storage(e.to_string()))?;
        let cluster_title: Option<String> = row.try_get("cluster_title").map_err(|e| Error::Storage(e.to_string()))?;

        Ok(Some(HeadlineSnapshot {
            titles: serde_json::from_str(&titles)?,
            cluster_title,
            recorded_at: DateTime::parse_from_rfc3339(&recorded_at)
                .map_err(|e| Error::Storage(format!("Failed to parse date: {}", e)))?
                .with_timezone(&Utc),
        }))
    }

    async fn save(&self, snapshot: &HeadlineSnapshot) -> Result<()> {
        let titles = serde_json::to_string(&snapshot.titles)?;
        sqlx::query("INSERT INTO headline_snapshots (recorded_at, titles, cluster_title) VALUES (?, ?, ?)")
            .bind(snapshot.recorded_at.to_rfc3339())
            .bind(titles)
            .bind(snapshot.cluster_title.as_deref())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(format!("Failed to save snapshot: {}", e)))?;
        Ok(())
    }
}

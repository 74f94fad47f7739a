//! libsql-backed key-value store
//!
//! Durable implementation of [`KvStore`] on an embedded libsql
//! (SQLite-compatible) database file.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE notes (
//!     id TEXT PRIMARY KEY,
//!     text TEXT NOT NULL,
//!     expires_at INTEGER      -- unix seconds, NULL = never
//! )
//! ```
//!
//! Expired rows are filtered on read and removed by
//! [`LibsqlStore::purge_expired`], which the server runs on an interval.
//! A TTL whose deadline does not fit in `i64` seconds is stored without
//! expiry.

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::{KvStore, StoreError};

/// Durable note store on a local libsql database
#[derive(Clone)]
pub struct LibsqlStore {
    db: Arc<Database>,
    db_path: PathBuf,
}

impl LibsqlStore {
    /// Open (or create) the database at `db_path` and ensure the schema exists
    ///
    /// Missing parent directories are created.
    pub async fn new(db_path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| StoreError::connection_failed(db_path.clone(), e))?;

        let store = Self {
            db: Arc::new(db),
            db_path,
        };
        store.initialize_schema().await?;

        tracing::info!("📦 Note store ready at {}", store.db_path.display());
        Ok(store)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// PRAGMA statements return rows, so they go through `query()`.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), StoreError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            StoreError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    async fn connect(&self) -> Result<libsql::Connection, StoreError> {
        let conn = self.db.connect()?;
        self.execute_pragma(&conn, "PRAGMA busy_timeout = 5000")
            .await?;
        Ok(conn)
    }

    async fn initialize_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                expires_at INTEGER
            )",
            (),
        )
        .await
        .map_err(|e| StoreError::sql_execution(format!("Failed to create notes table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_notes_expires_at ON notes(expires_at)",
            (),
        )
        .await
        .map_err(|e| {
            StoreError::sql_execution(format!("Failed to create expires_at index: {}", e))
        })?;

        Ok(())
    }

    /// Delete every row whose TTL has elapsed, returning the number removed
    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        let conn = self.connect().await?;
        let removed = conn
            .execute(
                "DELETE FROM notes WHERE expires_at IS NOT NULL AND expires_at <= ?",
                [Utc::now().timestamp()],
            )
            .await
            .map_err(|e| StoreError::sql_execution(format!("Failed to purge notes: {}", e)))?;
        Ok(removed)
    }
}

#[async_trait]
impl KvStore for LibsqlStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.connect().await?;
        let mut rows = conn
            .query(
                "SELECT text FROM notes
                 WHERE id = ? AND (expires_at IS NULL OR expires_at > ?)",
                (key, Utc::now().timestamp()),
            )
            .await
            .map_err(|e| StoreError::sql_execution(format!("Failed to read note: {}", e)))?;

        match rows.next().await? {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let expires_at = ttl.and_then(expiry_timestamp);

        let conn = self.connect().await?;
        conn.execute(
            "INSERT INTO notes (id, text, expires_at) VALUES (?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET text = excluded.text, expires_at = excluded.expires_at",
            (key, value, expires_at),
        )
        .await
        .map_err(|e| StoreError::sql_execution(format!("Failed to write note: {}", e)))?;
        Ok(())
    }
}

/// Unix-second deadline for `ttl` from now, or `None` when it does not fit
/// in an `i64` (stored without expiry)
fn expiry_timestamp(ttl: Duration) -> Option<i64> {
    let secs = i64::try_from(ttl.as_secs().max(1)).ok()?;
    Utc::now().timestamp().checked_add(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> anyhow::Result<(LibsqlStore, TempDir)> {
        let temp_dir = TempDir::new()?;
        let store = LibsqlStore::new(temp_dir.path().join("notes.db")).await?;
        Ok((store, temp_dir))
    }

    #[tokio::test]
    async fn test_put_then_get() -> anyhow::Result<()> {
        let (store, _temp_dir) = create_test_store().await?;

        store.put("abc", "hello\nworld".to_string(), None).await?;

        assert_eq!(store.get("abc").await?.as_deref(), Some("hello\nworld"));
        assert_eq!(store.get("missing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_put_overwrites() -> anyhow::Result<()> {
        let (store, _temp_dir) = create_test_store().await?;

        store.put("abc", "one".to_string(), None).await?;
        store.put("abc", "two".to_string(), None).await?;

        assert_eq!(store.get("abc").await?.as_deref(), Some("two"));
        Ok(())
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directory() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("dir").join("notes.db");

        let store = LibsqlStore::new(path.clone()).await?;

        assert_eq!(store.db_path(), path.as_path());
        assert!(path.parent().is_some_and(|p| p.exists()));
        Ok(())
    }

    #[tokio::test]
    async fn test_live_ttl_entry_is_readable_and_not_purged() -> anyhow::Result<()> {
        let (store, _temp_dir) = create_test_store().await?;

        store
            .put("ttl", "temporary".to_string(), Some(Duration::from_secs(3600)))
            .await?;

        assert_eq!(store.get("ttl").await?.as_deref(), Some("temporary"));
        assert_eq!(store.purge_expired().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_and_purged() -> anyhow::Result<()> {
        let (store, _temp_dir) = create_test_store().await?;

        store
            .put("ttl", "temporary".to_string(), Some(Duration::from_secs(1)))
            .await?;
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert_eq!(store.get("ttl").await?, None);
        assert_eq!(store.purge_expired().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_never_expires() -> anyhow::Result<()> {
        let (store, _temp_dir) = create_test_store().await?;

        store
            .put("huge", "kept".to_string(), Some(Duration::from_secs(u64::MAX)))
            .await?;
        store
            .put("edge", "kept".to_string(), Some(Duration::from_secs(i64::MAX as u64)))
            .await?;

        assert_eq!(store.get("huge").await?.as_deref(), Some("kept"));
        assert_eq!(store.get("edge").await?.as_deref(), Some("kept"));
        assert_eq!(store.purge_expired().await?, 0);
        Ok(())
    }

    #[test]
    fn test_expiry_timestamp_bounds() {
        assert_eq!(expiry_timestamp(Duration::from_secs(u64::MAX)), None);
        assert_eq!(expiry_timestamp(Duration::from_secs(i64::MAX as u64)), None);

        let now = Utc::now().timestamp();
        let deadline = expiry_timestamp(Duration::from_millis(10)).unwrap_or_default();
        assert!(deadline >= now + 1 && deadline <= now + 2);
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("notes.db");

        {
            let store = LibsqlStore::new(path.clone()).await?;
            store.put("persist", "still here".to_string(), None).await?;
        }

        let reopened = LibsqlStore::new(path).await?;
        assert_eq!(reopened.get("persist").await?.as_deref(), Some("still here"));
        Ok(())
    }
}

//! In-memory key-value store.
//!
//! [`MemoryStore`] keeps notes in a process-local map. It backs the unit
//! tests and the `STORE_BACKEND=memory` server mode; nothing survives a
//! restart.
//!
//! Expiry is lazy: an entry whose deadline has passed is treated as absent
//! on read, replaced by the next write to the same key, and removed by
//! [`MemoryStore::purge_expired`].
//!
//! A TTL too large to represent as a deadline is stored without expiry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{KvStore, StoreError};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}

/// Process-local store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| entry.value.clone()))
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), StoreError> {
        let expires_at = ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key_is_absent() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").await?, None);
        assert!(!store.exists("nope").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_value() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.put("k", "first".to_string(), None).await?;
        store.put("k", "second".to_string(), None).await?;

        assert_eq!(store.get("k").await?.as_deref(), Some("second"));
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store
            .put("short", "gone soon".to_string(), Some(Duration::from_millis(20)))
            .await?;
        store.put("forever", "stays".to_string(), None).await?;

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.get("short").await?, None);
        assert_eq!(store.get("forever").await?.as_deref(), Some("stays"));
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_put_without_ttl_clears_previous_ttl() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store
            .put("k", "v1".to_string(), Some(Duration::from_millis(20)))
            .await?;
        store.put("k", "v2".to_string(), None).await?;

        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(store.get("k").await?.as_deref(), Some("v2"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unrepresentable_ttl_never_expires() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store
            .put("huge", "kept".to_string(), Some(Duration::from_secs(u64::MAX)))
            .await?;

        assert_eq!(store.get("huge").await?.as_deref(), Some("kept"));
        assert_eq!(store.purge_expired().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_clones_share_entries() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let other = store.clone();
        store.put("shared", "yes".to_string(), None).await?;

        assert!(other.exists("shared").await?);
        Ok(())
    }
}

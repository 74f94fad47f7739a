//! KvStore Trait - Storage Abstraction Layer
//!
//! This module defines the `KvStore` trait, the only capability the note
//! service needs from its backing store: fetch a value by key, and write a
//! value with an optional time-to-live.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: Methods are async so network-backed stores fit the
//!    same interface as the embedded ones
//! 2. **No compare-and-swap**: Writes always overwrite (last writer wins).
//!    Existence is checked with [`KvStore::get`], so allocation is a
//!    check-then-act sequence and two concurrent writers of the same key
//!    race silently
//! 3. **Expiry is the store's job**: An expired key reads back exactly like
//!    a key that was never written
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use zanile_core::db::{KvStore, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
//!
//!     store.put("hello", "world".to_string(), Some(Duration::from_secs(60))).await?;
//!     assert_eq!(store.get("hello").await?.as_deref(), Some("world"));
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use std::time::Duration;

use super::StoreError;

/// Flat string-to-string store with optional per-key expiry
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single handle is shared by every
/// request the server handles.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value stored under `key`
    ///
    /// Returns `Ok(None)` when the key was never written or its TTL has
    /// elapsed. The two cases are indistinguishable.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// With `ttl = None` the entry never expires, and any TTL previously
    /// attached to the key is cleared.
    async fn put(&self, key: &str, value: String, ttl: Option<Duration>)
        -> Result<(), StoreError>;

    /// Whether a live value exists under `key`
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key).await?.is_some())
    }
}

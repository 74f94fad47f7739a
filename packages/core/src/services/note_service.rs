//! Note Service - Create and Read
//!
//! Orchestrates the two note operations against a [`KvStore`]:
//!
//! - **create**: validate size → resolve id (custom or allocated) → persist
//! - **read** / **read_raw**: fetch by exact id
//!
//! Notes are never updated or deleted here; they disappear only when the
//! store expires them.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use zanile_core::config::NoteConfig;
//! use zanile_core::db::MemoryStore;
//! use zanile_core::services::NoteService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = NoteService::new(Arc::new(MemoryStore::new()), NoteConfig::default());
//!
//!     let created = service
//!         .create("hello", Some("My Note!!"), "https://clip.example.com")
//!         .await?;
//!     assert_eq!(created.id, "my-note");
//!     assert_eq!(created.url, "https://clip.example.com/my-note");
//!
//!     assert_eq!(service.read("my-note").await?.as_deref(), Some("hello"));
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use tracing::instrument;

use crate::config::NoteConfig;
use crate::db::KvStore;
use crate::ids::{allocate_unique_id, is_valid_id, normalize_id};
use crate::models::CreatedNote;
use crate::services::error::NoteServiceError;

/// Create/read operations over the note store
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn KvStore>,
    config: NoteConfig,
}

impl NoteService {
    pub fn new(store: Arc<dyn KvStore>, config: NoteConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &NoteConfig {
        &self.config
    }

    /// Store `text` under a custom or freshly allocated id
    ///
    /// # Arguments
    ///
    /// * `text` - Note body, stored byte-for-byte
    /// * `custom_id` - Requested id; normalized before use. `None` or an
    ///   empty string allocates a random id
    /// * `origin` - Scheme and authority the share URL is built on
    ///
    /// # Errors
    ///
    /// Checks run in this order, so empty text wins over every id problem:
    /// - `EmptyText` - `text` is empty
    /// - `TooLarge` - UTF-8 length exceeds `max_bytes`
    /// - `InvalidId` - custom id normalizes to nothing valid
    /// - `IdTaken` - custom id already holds a live note
    /// - `AllocationExhausted` - ten random ids in a row were taken
    /// - `Store` - the backing store failed
    #[instrument(skip(self, text), fields(bytes = text.len()))]
    pub async fn create(
        &self,
        text: &str,
        custom_id: Option<&str>,
        origin: &str,
    ) -> Result<CreatedNote, NoteServiceError> {
        if text.is_empty() {
            return Err(NoteServiceError::EmptyText);
        }

        if text.len() > self.config.max_bytes {
            return Err(NoteServiceError::too_large(self.config.max_bytes));
        }

        let id = match custom_id.filter(|raw| !raw.is_empty()) {
            Some(raw) => {
                let id = normalize_id(raw);
                if !is_valid_id(&id) {
                    return Err(NoteServiceError::InvalidId);
                }
                if self.store.exists(&id).await? {
                    return Err(NoteServiceError::id_taken(id));
                }
                id
            }
            None => allocate_unique_id(self.store.as_ref()).await?,
        };

        self.store
            .put(&id, text.to_string(), self.config.ttl())
            .await?;

        tracing::info!("📝 Created note '{}' ({} bytes)", id, text.len());
        Ok(CreatedNote::new(id, origin))
    }

    /// Fetch a note for the HTML view
    ///
    /// The id is used exactly as given; no normalization. Expired and
    /// never-created notes both come back as `None`.
    #[instrument(skip(self))]
    pub async fn read(&self, id: &str) -> Result<Option<String>, NoteServiceError> {
        let text = self.store.get(id).await?;
        tracing::debug!("🔍 Read note '{}': found={}", id, text.is_some());
        Ok(text)
    }

    /// Fetch a note for plain-text delivery; same lookup as [`Self::read`]
    pub async fn read_raw(&self, id: &str) -> Result<Option<String>, NoteServiceError> {
        self.read(id).await
    }
}

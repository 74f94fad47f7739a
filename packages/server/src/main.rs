//! Zanile Clipboard Server Binary
//!
//! Starts the HTTP server that serves the clipboard pages and JSON API.
//!
//! # Usage
//!
//! ```bash
//! # Default settings (127.0.0.1:8787, ~/.zanile/database/notes.db)
//! cargo run --bin zanile-server
//!
//! # Notes expire after a day, throwaway in-memory store
//! DEFAULT_TTL_SECONDS=86400 STORE_BACKEND=memory cargo run --bin zanile-server
//! ```
//!
//! # Environment Variables
//!
//! See [`zanile_core::config`] for the full list. `RUST_LOG` controls
//! logging (e.g. "info", "debug", "zanile_core=trace").

use std::sync::Arc;
use std::time::Duration;

use zanile_core::config::{ServerConfig, StoreBackend};
use zanile_core::db::{KvStore, LibsqlStore, MemoryStore};
use zanile_core::http::{start_server, AppState};
use zanile_core::NoteService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("📋 Zanile Clipboard Server");

    let config = ServerConfig::from_env()?;

    tracing::info!("📡 Listen address: {}", config.listen_addr());
    tracing::info!("📏 Max note size: {} bytes", config.notes.max_bytes);
    match config.notes.ttl() {
        Some(ttl) => tracing::info!("⏳ Notes expire after {}s", ttl.as_secs()),
        None => tracing::info!("⏳ Notes never expire"),
    }

    let store: Arc<dyn KvStore> = match &config.store {
        StoreBackend::Libsql { db_path } => {
            let store = LibsqlStore::new(db_path.clone()).await?;
            spawn_purge_task(config.purge_interval, {
                let store = store.clone();
                move || {
                    let store = store.clone();
                    async move { store.purge_expired().await.map_err(anyhow::Error::from) }
                }
            });
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("⚠️  In-memory store: notes are lost on restart");
            let store = MemoryStore::new();
            spawn_purge_task(config.purge_interval, {
                let store = store.clone();
                move || {
                    let store = store.clone();
                    async move { Ok(store.purge_expired().await as u64) }
                }
            });
            Arc::new(store)
        }
    };

    let notes = NoteService::new(store, config.notes);
    let state = AppState::new(notes, config.public_url.clone());

    start_server(state, &config.listen_addr()).await?;

    Ok(())
}

/// Periodically remove expired notes from the store
fn spawn_purge_task<F, Fut>(interval: Duration, purge: F)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = anyhow::Result<u64>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match purge().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!("🧹 Purged {} expired notes", removed),
                Err(e) => tracing::error!("❌ Failed to purge expired notes: {}", e),
            }
        }
    });
}

//! HTTP server for the clipboard
//!
//! Dispatches requests by method and path to the note service and the page
//! renderer. Handlers are stateless apart from the shared [`AppState`]; all
//! coordination between requests is left to the store.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zanile_core::config::NoteConfig;
//! use zanile_core::db::MemoryStore;
//! use zanile_core::http::{start_server, AppState};
//! use zanile_core::services::NoteService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let notes = NoteService::new(Arc::new(MemoryStore::new()), NoteConfig::default());
//!     start_server(AppState::new(notes, None), "127.0.0.1:8787").await
//! }
//! ```

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderMap},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::NoteService;

mod error;
mod note_endpoints;

pub use error::{ApiError, ErrorBody, PageError};
pub use note_endpoints::HealthStatus;

/// Extra request-body room on top of the note limit, for JSON framing and
/// escape sequences
const BODY_LIMIT_SLACK: usize = 64 * 1024;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub notes: Arc<NoteService>,
    /// Fixed origin for share URLs; when `None` it is derived per request
    pub public_url: Option<String>,
}

impl AppState {
    pub fn new(notes: NoteService, public_url: Option<String>) -> Self {
        Self {
            notes: Arc::new(notes),
            public_url: public_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Origin (`scheme://host[:port]`) the request was addressed to
    ///
    /// Uses the configured public URL when set. Otherwise the scheme comes
    /// from `X-Forwarded-Proto` (default `http`) and the authority from the
    /// `Host` header.
    pub fn origin(&self, headers: &HeaderMap) -> String {
        if let Some(url) = &self.public_url {
            return url.clone();
        }

        let header_str = |name| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let scheme = header_str(header::HeaderName::from_static("x-forwarded-proto"))
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .unwrap_or("http");
        let host = header_str(header::HOST).unwrap_or("localhost");

        format!("{}://{}", scheme, host)
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .notes
        .config()
        .max_bytes
        .saturating_mul(6)
        .saturating_add(BODY_LIMIT_SLACK);

    Router::new()
        .merge(note_endpoints::routes())
        .fallback(note_endpoints::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router on `addr` until the process stops
///
/// # Errors
///
/// Returns error if the listener cannot bind or the server fails.
pub async fn start_server(state: AppState, addr: &str) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Clipboard server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

//! Zanile Clipboard Core
//!
//! A minimal paste service: a client submits text, gets back a short id and
//! share URL, and anyone holding the URL can read the text back.
//!
//! # Architecture
//!
//! - **Flat store**: notes are `id → text` pairs with optional store-managed TTL
//! - **Short typeable ids**: 1–64 chars of `[a-z0-9-]`, user-chosen or random
//! - **Immutable notes**: no update or delete; notes leave only by expiry
//!
//! # Modules
//!
//! - [`db`] - `KvStore` trait with libsql and in-memory implementations
//! - [`ids`] - identifier normalization, validation and allocation
//! - [`services`] - `NoteService` (create / read)
//! - [`render`] - HTML pages
//! - [`http`] - axum router and server
//! - [`config`] - environment-driven configuration

pub mod config;
pub mod db;
pub mod http;
pub mod ids;
pub mod models;
pub mod render;
pub mod services;

// Re-export commonly used types
pub use config::{NoteConfig, ServerConfig};
pub use models::*;
pub use services::*;

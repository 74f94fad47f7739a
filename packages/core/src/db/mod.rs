//! Storage Layer
//!
//! Notes live in a flat id → text mapping with optional store-managed expiry.
//! Everything above this module talks to storage through [`KvStore`]:
//!
//! - [`LibsqlStore`] - durable embedded database (default for the server)
//! - [`MemoryStore`] - process-local map for tests and throwaway instances

mod error;
mod kv_store;
mod libsql_store;
mod memory_store;

pub use error::StoreError;
pub use kv_store::KvStore;
pub use libsql_store::LibsqlStore;
pub use memory_store::MemoryStore;

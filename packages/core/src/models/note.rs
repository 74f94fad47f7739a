//! Note models
//!
//! A note is an immutable text blob addressed by its id. The store holds only
//! `id → text`; expiry is tracked by the store and never surfaced here.

use serde::{Deserialize, Serialize};

/// Result of a successful create: the resolved id and its share URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedNote {
    pub id: String,
    pub url: String,
}

impl CreatedNote {
    /// Build the share URL by joining `origin` with `/{id}`
    ///
    /// A trailing `/` on the origin is dropped so the URL has a single slash.
    pub fn new(id: String, origin: &str) -> Self {
        let url = format!("{}/{}", origin.trim_end_matches('/'), id);
        Self { id, url }
    }
}

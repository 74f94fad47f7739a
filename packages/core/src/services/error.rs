//! Service Layer Error Types
//!
//! Business-rule failures of note creation and retrieval. A missing note is
//! not an error; reads return `Ok(None)`.

use crate::db::StoreError;
use crate::ids::AllocationError;
use thiserror::Error;

/// Note service errors
#[derive(Error, Debug)]
pub enum NoteServiceError {
    /// Note text was empty
    #[error("Text is required")]
    EmptyText,

    /// Note text exceeded the configured byte limit
    #[error("Too large. Limit {limit} bytes")]
    TooLarge { limit: usize },

    /// Custom id was empty or malformed after normalization
    #[error("Invalid id")]
    InvalidId,

    /// Custom id is already held by a live note
    #[error("ID already exists")]
    IdTaken { id: String },

    /// No unclaimed random id was found within the attempt budget
    #[error("Could not generate unique id after {attempts} attempts")]
    AllocationExhausted { attempts: usize },

    /// Backing store failed
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),
}

impl NoteServiceError {
    pub fn too_large(limit: usize) -> Self {
        Self::TooLarge { limit }
    }

    pub fn id_taken(id: impl Into<String>) -> Self {
        Self::IdTaken { id: id.into() }
    }
}

impl From<AllocationError> for NoteServiceError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::Exhausted { attempts } => Self::AllocationExhausted { attempts },
            AllocationError::Store(e) => Self::Store(e),
        }
    }
}

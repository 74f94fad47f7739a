//! Business Services
//!
//! - `NoteService` - note creation and retrieval against the key-value store
//!
//! Services sit between the storage layer and the HTTP router and own every
//! business rule (size limits, id resolution, expiry policy).

pub mod error;
pub mod note_service;

pub use error::NoteServiceError;
pub use note_service::NoteService;

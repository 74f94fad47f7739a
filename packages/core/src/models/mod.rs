//! Data Models
//!
//! - `CreatedNote` - id and share URL returned by note creation

mod note;

pub use note::CreatedNote;

//! Content repository adapters
//!
//! | Adapter | Backing store | Change feed |
//! |---------|---------------|-------------|
//! | [`InMemoryContentRepository`] | process memory | local writes |
//! | [`JsonFileContentRepository`] | JSON file | local writes + optional file polling |
//! | [`PostgrestContentRepository`] | hosted relational backend (REST) | local writes |

mod json_file;
mod memory;
mod postgrest;

pub use json_file::JsonFileContentRepository;
pub use memory::{InMemoryContentRepository, StoredHistory};
pub use postgrest::PostgrestContentRepository;

/// Capacity of the change broadcast channel
const CHANGE_CHANNEL_CAPACITY: usize = 64;

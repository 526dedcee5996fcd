//! Infrastructure layer for content-forge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod auth;
pub mod config;
pub mod markup;
pub mod storage;
pub mod webhook;

#[cfg(test)]
mod test_http;

// Re-export commonly used types
pub use auth::{LocalSessionStore, StoredSession};
pub use config::{
    ConfigLoader, FileAuthConfig, FileConfig, FileNormalizerConfig, FileOutputConfig,
    FilePostgrestConfig, FileStorageConfig, FileWebhookConfig, StorageBackend,
};
pub use markup::XmlMarkupParser;
pub use storage::{
    InMemoryContentRepository, JsonFileContentRepository, PostgrestContentRepository,
    StoredHistory,
};
pub use webhook::{HttpResponseSource, MAX_BODY_SIZE, WebhookGateway};

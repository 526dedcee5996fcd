//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod auth;
mod normalizer;
mod output;
mod storage;
mod webhook;

pub use auth::FileAuthConfig;
pub use normalizer::FileNormalizerConfig;
pub use output::FileOutputConfig;
pub use storage::{FilePostgrestConfig, FileStorageConfig, StorageBackend};
pub use webhook::FileWebhookConfig;

use forge_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Generation webhook endpoint
    pub webhook: FileWebhookConfig,
    /// Content history persistence
    pub storage: FileStorageConfig,
    /// Local session handling
    pub auth: FileAuthConfig,
    /// Response normalization
    pub normalizer: FileNormalizerConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Commands that never call the webhook may ignore `webhook.*` issues;
    /// see [`FileConfig::validate_storage`].
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        self.webhook.validate(&mut issues);
        self.storage.validate(&mut issues);
        issues
    }

    /// Validate only what the history commands need
    pub fn validate_storage(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        self.storage.validate(&mut issues);
        issues
    }
}

//! Configuration file loading for content-forge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FORGE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./forge.toml` or `./.forge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/content-forge/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAuthConfig, FileConfig, FileNormalizerConfig, FileOutputConfig, FilePostgrestConfig,
    FileStorageConfig, FileWebhookConfig, StorageBackend,
};
pub use loader::ConfigLoader;

//! Storage configuration from TOML (`[storage]` section)

use forge_domain::config::validation::{ConfigIssue, ConfigIssueCode, check_http_url};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which repository adapter holds the content history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file in the data directory
    #[default]
    File,
    /// Process memory only; lost on exit
    Memory,
    /// Hosted relational backend over its REST interface
    Postgrest,
}

/// Raw PostgREST settings (`[storage.postgrest]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePostgrestConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub url: Option<String>,
    /// Anonymous / service API key
    pub api_key: Option<String>,
    /// Table name
    pub table: String,
}

impl Default for FilePostgrestConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: "content".to_string(),
        }
    }
}

/// Raw storage configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub backend: StorageBackend,
    /// History file for the `file` backend (default: data dir)
    pub path: Option<PathBuf>,
    pub postgrest: FilePostgrestConfig,
}

impl FileStorageConfig {
    /// History file for the `file` backend
    pub fn history_path(&self) -> Option<PathBuf> {
        self.path.clone().or_else(|| {
            dirs::data_dir().map(|d| d.join("content-forge").join("history.json"))
        })
    }

    pub fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        if self.backend != StorageBackend::Postgrest {
            return;
        }
        check_http_url(
            "storage.postgrest.url",
            self.postgrest.url.as_deref().unwrap_or_default(),
            issues,
        );
        if self.postgrest.api_key.as_deref().unwrap_or_default().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "storage.postgrest.api_key".to_string(),
                },
                "storage.postgrest.api_key: value is required for the postgrest backend",
            ));
        }
    }
}

//! Auth configuration from TOML (`[auth]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw auth configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuthConfig {
    /// Session file (default: data dir)
    pub session_file: Option<PathBuf>,
}

impl FileAuthConfig {
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session_file.clone().or_else(|| {
            dirs::data_dir().map(|d| d.join("content-forge").join("session.json"))
        })
    }
}

//! Normalizer configuration from TOML (`[normalizer]` section)

use forge_domain::XmlFallback;
use serde::{Deserialize, Serialize};

/// Raw normalizer configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNormalizerConfig {
    /// `raw_document` (return XML verbatim) or `reject`
    pub xml_fallback: XmlFallback,
}

//! Webhook configuration from TOML (`[webhook]` section)

use forge_domain::config::validation::{ConfigIssue, ConfigIssueCode, check_http_url};
use serde::{Deserialize, Serialize};

/// Longest accepted request timeout
const MAX_TIMEOUT_SECS: u64 = 600;

/// Raw webhook configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileWebhookConfig {
    /// Endpoint receiving `{prompt, timestamp, userId}` POSTs
    pub url: String,
    /// Whole-request timeout, body read included
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl Default for FileWebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: 60,
            user_agent: concat!("content-forge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FileWebhookConfig {
    pub fn validate(&self, issues: &mut Vec<ConfigIssue>) {
        check_http_url("webhook.url", &self.url, issues);
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "webhook.timeout_secs".to_string(),
                    value: self.timeout_secs,
                },
                format!(
                    "webhook.timeout_secs: {} is outside 1..={}",
                    self.timeout_secs, MAX_TIMEOUT_SECS
                ),
            ));
        }
    }
}

//! Webhook request body

use crate::content::value_objects::{Prompt, UserId};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// JSON body sent to the generation webhook.
///
/// Serializes as `{"prompt": ..., "timestamp": ..., "userId": ...}` with the
/// timestamp in ISO-8601 UTC with millisecond precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub prompt: String,
    pub timestamp: String,
    pub user_id: String,
}

impl GenerationRequest {
    pub fn new(prompt: &Prompt, user_id: &UserId, at: DateTime<Utc>) -> Self {
        Self {
            prompt: prompt.as_str().to_string(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            user_id: user_id.as_str().to_string(),
        }
    }
}

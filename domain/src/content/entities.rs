//! Content entities

use super::value_objects::{Prompt, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a content record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub i64);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ContentId)
    }
}

/// A stored prompt and the content generated for it.
///
/// Field names match the `content` table columns so the record can be
/// exchanged with the store without a mapping layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: ContentId,
    pub created_at: DateTime<Utc>,
    pub prompt: String,
    pub generated_content: String,
    pub user_id: UserId,
}

impl ContentRecord {
    /// Whether `user` owns this record
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.user_id == user
    }
}

/// Insert payload for a freshly generated piece of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContent {
    pub prompt: String,
    pub generated_content: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl NewContent {
    pub fn new(
        prompt: &Prompt,
        generated_content: impl Into<String>,
        user_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            prompt: prompt.as_str().to_string(),
            generated_content: generated_content.into(),
            user_id,
            created_at,
        }
    }

    /// Materialize as a record once the store has assigned an id
    pub fn into_record(self, id: ContentId) -> ContentRecord {
        ContentRecord {
            id,
            created_at: self.created_at,
            prompt: self.prompt,
            generated_content: self.generated_content,
            user_id: self.user_id,
        }
    }
}

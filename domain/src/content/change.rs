//! Change notifications for a user's content history.
//!
//! Subscribers don't get the changed row, only a signal that something
//! happened; the expected reaction is to refetch the list.

use super::entities::ContentId;
use super::value_objects::UserId;
use serde::{Deserialize, Serialize};

/// What happened to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Inserted => "inserted",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// A change to one record in one user's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentChange {
    pub kind: ChangeKind,
    pub id: ContentId,
    pub user_id: UserId,
}

impl ContentChange {
    pub fn new(kind: ChangeKind, id: ContentId, user_id: UserId) -> Self {
        Self { kind, id, user_id }
    }

    pub fn concerns(&self, user: &UserId) -> bool {
        &self.user_id == user
    }
}

//! In-memory content repository

use super::CHANGE_CHANNEL_CAPACITY;
use async_trait::async_trait;
use forge_application::ports::content_repository::{
    ChangeStream, ContentRepository, RepositoryError, user_change_stream,
};
use forge_domain::{ChangeKind, ContentChange, ContentId, ContentRecord, NewContent, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

/// Serializable state of a repository: all records plus the id counter.
///
/// The counter is kept so ids of deleted records are never handed out again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredHistory {
    pub next_id: i64,
    pub records: Vec<ContentRecord>,
}

impl Default for StoredHistory {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// Content repository held entirely in process memory.
pub struct InMemoryContentRepository {
    state: RwLock<StoredHistory>,
    changes: broadcast::Sender<ContentChange>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self::from_history(StoredHistory::default())
    }

    pub fn from_history(history: StoredHistory) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(history),
            changes,
        }
    }

    /// Copy of the full state, every user included
    pub async fn snapshot(&self) -> StoredHistory {
        self.state.read().await.clone()
    }

    /// Replace the whole state, broadcasting one change per record that was
    /// added, edited or removed.
    pub async fn replace(&self, history: StoredHistory) -> Vec<ContentChange> {
        let changes = {
            let mut state = self.state.write().await;
            let changes = diff(&state.records, &history.records);
            *state = history;
            changes
        };
        for change in &changes {
            self.notify(change.clone());
        }
        changes
    }

    fn notify(&self, change: ContentChange) {
        debug!(kind = change.kind.as_str(), id = %change.id, "Broadcasting content change");
        // No receivers is fine
        let _ = self.changes.send(change);
    }
}

impl Default for InMemoryContentRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn diff(old: &[ContentRecord], new: &[ContentRecord]) -> Vec<ContentChange> {
    let old_by_id: HashMap<ContentId, &ContentRecord> = old.iter().map(|r| (r.id, r)).collect();
    let new_by_id: HashMap<ContentId, &ContentRecord> = new.iter().map(|r| (r.id, r)).collect();

    let mut changes = Vec::new();
    for record in new {
        match old_by_id.get(&record.id) {
            None => changes.push(ContentChange::new(
                ChangeKind::Inserted,
                record.id,
                record.user_id.clone(),
            )),
            Some(previous) if *previous != record => changes.push(ContentChange::new(
                ChangeKind::Updated,
                record.id,
                record.user_id.clone(),
            )),
            Some(_) => {}
        }
    }
    for record in old {
        if !new_by_id.contains_key(&record.id) {
            changes.push(ContentChange::new(
                ChangeKind::Deleted,
                record.id,
                record.user_id.clone(),
            ));
        }
    }
    changes
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn insert(&self, content: NewContent) -> Result<ContentRecord, RepositoryError> {
        let record = {
            let mut state = self.state.write().await;
            let id = ContentId(state.next_id);
            state.next_id += 1;
            let record = content.into_record(id);
            state.records.push(record.clone());
            record
        };
        self.notify(ContentChange::new(
            ChangeKind::Inserted,
            record.id,
            record.user_id.clone(),
        ));
        Ok(record)
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<ContentRecord>, RepositoryError> {
        let mut records: Vec<ContentRecord> = self
            .state
            .read()
            .await
            .records
            .iter()
            .filter(|r| r.is_owned_by(user))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn update_content(
        &self,
        user: &UserId,
        id: ContentId,
        generated_content: &str,
    ) -> Result<ContentRecord, RepositoryError> {
        let record = {
            let mut state = self.state.write().await;
            let record = state
                .records
                .iter_mut()
                .find(|r| r.id == id && r.is_owned_by(user))
                .ok_or(RepositoryError::NotFound(id))?;
            record.generated_content = generated_content.to_string();
            record.clone()
        };
        self.notify(ContentChange::new(ChangeKind::Updated, id, user.clone()));
        Ok(record)
    }

    async fn delete(&self, user: &UserId, id: ContentId) -> Result<(), RepositoryError> {
        {
            let mut state = self.state.write().await;
            let position = state
                .records
                .iter()
                .position(|r| r.id == id && r.is_owned_by(user))
                .ok_or(RepositoryError::NotFound(id))?;
            state.records.remove(position);
        }
        self.notify(ContentChange::new(ChangeKind::Deleted, id, user.clone()));
        Ok(())
    }

    fn subscribe(&self, user: &UserId) -> ChangeStream {
        user_change_stream(self.changes.subscribe(), user.clone())
    }
}

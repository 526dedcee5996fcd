//! JSON-file content repository
//!
//! Keeps the history in memory and rewrites the whole file after every
//! mutation (write to a temp file, then rename). Before each mutation the
//! file is read back so writes made by another process are not clobbered.

use super::memory::{InMemoryContentRepository, StoredHistory};
use async_trait::async_trait;
use forge_application::ports::content_repository::{
    ChangeStream, ContentRepository, RepositoryError,
};
use forge_domain::{ContentChange, ContentId, ContentRecord, NewContent, UserId};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Content repository persisted to a single JSON file.
pub struct JsonFileContentRepository {
    path: PathBuf,
    inner: InMemoryContentRepository,
    /// Serializes read-modify-write cycles against the file
    write_lock: Mutex<()>,
}

impl JsonFileContentRepository {
    /// Open the history at `path`; a missing file is an empty history.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let history = read_history(&path).await?;
        info!(
            path = %path.display(),
            records = history.records.len(),
            "Opened content history"
        );
        Ok(Self {
            path,
            inner: InMemoryContentRepository::from_history(history),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and broadcast whatever changed since the last read.
    pub async fn reload(&self) -> Result<Vec<ContentChange>, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.sync_from_disk().await
    }

    /// Poll the file every `interval` so changes from other processes reach
    /// subscribers. The task ends once the repository is dropped.
    pub fn spawn_file_poller(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let repo = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // First tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(repo) = repo.upgrade() else {
                    break;
                };
                match repo.reload().await {
                    Ok(changes) if !changes.is_empty() => {
                        debug!(count = changes.len(), "Picked up external history changes");
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "Failed to poll history file"),
                }
            }
        })
    }

    async fn sync_from_disk(&self) -> Result<Vec<ContentChange>, RepositoryError> {
        let history = read_history(&self.path).await?;
        Ok(self.inner.replace(history).await)
    }

    /// Write the current state; on failure, fall back to what is on disk so
    /// memory never runs ahead of the file.
    async fn persist(&self) -> Result<(), RepositoryError> {
        let snapshot = self.inner.snapshot().await;
        if let Err(e) = write_history(&self.path, &snapshot).await {
            warn!(path = %self.path.display(), error = %e, "Failed to write history, rolling back");
            if let Err(reload_error) = self.sync_from_disk().await {
                warn!(error = %reload_error, "Rollback reload failed");
            }
            return Err(e);
        }
        Ok(())
    }
}

async fn read_history(path: &Path) -> Result<StoredHistory, RepositoryError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredHistory::default()),
        Err(e) => Err(e.into()),
    }
}

async fn write_history(path: &Path, history: &StoredHistory) -> Result<(), RepositoryError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(history)?;
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl ContentRepository for JsonFileContentRepository {
    async fn insert(&self, content: NewContent) -> Result<ContentRecord, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.sync_from_disk().await?;
        let record = self.inner.insert(content).await?;
        self.persist().await?;
        Ok(record)
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<ContentRecord>, RepositoryError> {
        self.inner.list_for_user(user).await
    }

    async fn update_content(
        &self,
        user: &UserId,
        id: ContentId,
        generated_content: &str,
    ) -> Result<ContentRecord, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.sync_from_disk().await?;
        let record = self.inner.update_content(user, id, generated_content).await?;
        self.persist().await?;
        Ok(record)
    }

    async fn delete(&self, user: &UserId, id: ContentId) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.sync_from_disk().await?;
        self.inner.delete(user, id).await?;
        self.persist().await
    }

    fn subscribe(&self, user: &UserId) -> ChangeStream {
        self.inner.subscribe(user)
    }
}

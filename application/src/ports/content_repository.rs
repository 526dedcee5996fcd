//! Content repository port
//!
//! The persistence collaborator: insert / select / update / delete over the
//! `content` table plus a per-user change feed.

use async_trait::async_trait;
use forge_domain::{ContentChange, ContentId, ContentRecord, NewContent, UserId};
use futures::StreamExt;
use futures::stream::BoxStream;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Stream of change notifications for one user.
///
/// Ends when the repository is dropped.
pub type ChangeStream = BoxStream<'static, ContentChange>;

/// Errors reported by repository adapters
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Content {0} not found")]
    NotFound(ContentId),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Persistence for generated content
///
/// Every operation is scoped to a user: records owned by someone else behave
/// as if they did not exist.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert a record; the store assigns the id
    async fn insert(&self, content: NewContent) -> Result<ContentRecord, RepositoryError>;

    /// All records of `user`, newest `created_at` first
    async fn list_for_user(&self, user: &UserId) -> Result<Vec<ContentRecord>, RepositoryError>;

    /// Replace the generated content of one record
    async fn update_content(
        &self,
        user: &UserId,
        id: ContentId,
        generated_content: &str,
    ) -> Result<ContentRecord, RepositoryError>;

    /// Delete one record
    async fn delete(&self, user: &UserId, id: ContentId) -> Result<(), RepositoryError>;

    /// Subscribe to inserts, updates and deletes of `user`'s records
    fn subscribe(&self, user: &UserId) -> ChangeStream;
}

/// Adapt a broadcast receiver of all changes into one user's [`ChangeStream`].
///
/// A lagged receiver skips what it missed: subscribers refetch on every
/// signal, so the next delivered change brings them up to date.
pub fn user_change_stream(
    receiver: broadcast::Receiver<ContentChange>,
    user: UserId,
) -> ChangeStream {
    futures::stream::unfold((receiver, user), |(mut receiver, user)| async move {
        loop {
            match receiver.recv().await {
                Ok(change) if change.concerns(&user) => return Some((change, (receiver, user))),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Change subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .boxed()
}

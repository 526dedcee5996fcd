//! Content History use case.
//!
//! Lists, edits and deletes the signed-in user's generated content, and keeps
//! a live view of it by refetching whenever the repository signals a change.

use crate::ports::auth::{AuthError, AuthProvider};
use crate::ports::content_repository::{ContentRepository, RepositoryError};
use crate::ports::feedback::FeedbackNotifier;
use forge_domain::{ContentChange, ContentId, ContentRecord, UserId};
use futures::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while working with the history.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("You must be logged in")]
    NotAuthenticated,

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Repository(#[from] RepositoryError),
}

/// The full history at one point in time, and the change that caused the
/// refetch (`None` for the initial load).
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub records: Vec<ContentRecord>,
    pub trigger: Option<ContentChange>,
}

/// Use case for the content history view.
pub struct ContentHistoryUseCase {
    auth: Arc<dyn AuthProvider>,
    repository: Arc<dyn ContentRepository>,
}

impl ContentHistoryUseCase {
    pub fn new(auth: Arc<dyn AuthProvider>, repository: Arc<dyn ContentRepository>) -> Self {
        Self { auth, repository }
    }

    async fn require_user(&self) -> Result<UserId, HistoryError> {
        self.auth
            .current_user()
            .await?
            .ok_or(HistoryError::NotAuthenticated)
    }

    /// The user's records, newest first.
    pub async fn list(
        &self,
        feedback: &dyn FeedbackNotifier,
    ) -> Result<Vec<ContentRecord>, HistoryError> {
        let user = self.require_user().await?;
        self.fetch(&user).await.inspect_err(|e| {
            warn!(error = %e, "Failed to fetch content history");
            feedback.error("Failed to fetch content history");
        })
    }

    /// Replace the generated content of one record.
    pub async fn update(
        &self,
        id: ContentId,
        generated_content: &str,
        feedback: &dyn FeedbackNotifier,
    ) -> Result<ContentRecord, HistoryError> {
        let result = self.try_update(id, generated_content).await;
        match &result {
            Ok(_) => {
                info!(%id, "Content updated");
                feedback.success("Content updated successfully");
            }
            Err(e) => {
                warn!(%id, error = %e, "Failed to update content");
                feedback.error("Failed to update content");
            }
        }
        result
    }

    async fn try_update(
        &self,
        id: ContentId,
        generated_content: &str,
    ) -> Result<ContentRecord, HistoryError> {
        let user = self.require_user().await?;
        Ok(self
            .repository
            .update_content(&user, id, generated_content)
            .await?)
    }

    /// Delete one record.
    pub async fn delete(
        &self,
        id: ContentId,
        feedback: &dyn FeedbackNotifier,
    ) -> Result<(), HistoryError> {
        let result = self.try_delete(id).await;
        match &result {
            Ok(()) => {
                info!(%id, "Content deleted");
                feedback.success("Content deleted successfully");
            }
            Err(e) => {
                warn!(%id, error = %e, "Failed to delete content");
                feedback.error("Failed to delete content");
            }
        }
        result
    }

    async fn try_delete(&self, id: ContentId) -> Result<(), HistoryError> {
        let user = self.require_user().await?;
        Ok(self.repository.delete(&user, id).await?)
    }

    /// Deliver the history to `on_snapshot` now and after every change,
    /// until `cancel` fires or the change feed ends.
    ///
    /// A failed initial load is returned as an error; a failed refetch is
    /// reported through `feedback` and the watch carries on.
    pub async fn watch<F>(
        &self,
        cancel: CancellationToken,
        feedback: &dyn FeedbackNotifier,
        mut on_snapshot: F,
    ) -> Result<(), HistoryError>
    where
        F: FnMut(HistorySnapshot) + Send,
    {
        let user = self.require_user().await?;
        // Subscribe before the initial fetch so no change slips in between
        let mut changes = self.repository.subscribe(&user);

        let records = self.fetch(&user).await?;
        on_snapshot(HistorySnapshot {
            records,
            trigger: None,
        });

        loop {
            let change = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("History watch cancelled");
                    break;
                }
                change = changes.next() => change,
            };

            let Some(change) = change else {
                debug!("Change feed closed");
                break;
            };

            debug!(kind = change.kind.as_str(), id = %change.id, "Content changed, refetching");
            match self.fetch(&user).await {
                Ok(records) => on_snapshot(HistorySnapshot {
                    records,
                    trigger: Some(change),
                }),
                Err(e) => {
                    warn!(error = %e, "Failed to refetch content history");
                    feedback.error("Failed to fetch content history");
                }
            }
        }
        Ok(())
    }

    async fn fetch(&self, user: &UserId) -> Result<Vec<ContentRecord>, HistoryError> {
        Ok(self.repository.list_for_user(user).await?)
    }
}

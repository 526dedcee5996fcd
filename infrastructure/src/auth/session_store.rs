//! File-backed session store
//!
//! The signed-in identity is a small JSON document in the data directory.
//! No file means nobody is signed in.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forge_application::ports::auth::{AuthError, AuthProvider};
use forge_domain::UserId;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk session document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub user_id: UserId,
    pub signed_in_at: DateTime<Utc>,
}

/// [`AuthProvider`] reading the session from a local JSON file.
#[derive(Debug, Clone)]
pub struct LocalSessionStore {
    path: PathBuf,
}

impl LocalSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, if any.
    pub async fn session(&self) -> Result<Option<StoredSession>, AuthError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::Storage(e.to_string())),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AuthError::CorruptSession(format!("{}: {e}", self.path.display())))
    }

    /// Record `user` as signed in, replacing any previous session.
    pub async fn sign_in(&self, user: UserId) -> Result<StoredSession, AuthError> {
        let session = StoredSession {
            user_id: user,
            signed_in_at: Utc::now(),
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuthError::Storage(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&session)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        info!(user = %session.user_id, "Signed in");
        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for LocalSessionStore {
    async fn current_user(&self) -> Result<Option<UserId>, AuthError> {
        Ok(self.session().await?.map(|s| s.user_id))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("Signed out");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session to remove");
                Ok(())
            }
            Err(e) => Err(AuthError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalSessionStore {
        LocalSessionStore::new(dir.path().join("nested").join("session.json"))
    }

    #[tokio::test]
    async fn test_no_file_means_signed_out() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sign_in_then_out() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let user = UserId::new("user-42").unwrap();

        store.sign_in(user.clone()).await.unwrap();
        assert_eq!(store.current_user().await.unwrap(), Some(user));

        store.sign_out().await.unwrap();
        assert_eq!(store.current_user().await.unwrap(), None);
        // Signing out twice is fine
        store.sign_out().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_session_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = LocalSessionStore::new(&path)
            .current_user()
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::CorruptSession(_)));
    }

    #[tokio::test]
    async fn test_blank_user_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"user_id":"","signed_in_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let err = LocalSessionStore::new(&path).session().await.unwrap_err();
        assert!(matches!(err, AuthError::CorruptSession(_)));
    }
}

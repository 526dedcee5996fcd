//! Auth port
//!
//! The identity provider is external; the application only needs to know
//! who is signed in and to be able to sign them out.

use async_trait::async_trait;
use forge_domain::UserId;
use thiserror::Error;

/// Errors reported by auth adapters
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Corrupt session: {0}")]
    CorruptSession(String),
}

/// Access to the current authenticated session
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, or `None` when there is no session
    async fn current_user(&self) -> Result<Option<UserId>, AuthError>;

    /// End the current session. Signing out without a session is not an error.
    async fn sign_out(&self) -> Result<(), AuthError>;
}

//! Repository port for OAuth state persistence.

use crate::credential::domain::UserId;
use crate::hosting::domain::Platform;
use crate::oauth::domain::OAuthState;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for state repository operations.
pub type StateRepositoryResult<T> = Result<T, StateRepositoryError>;

/// OAuth state persistence contract.
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Stores a freshly issued state record.
    ///
    /// # Errors
    ///
    /// Returns [`StateRepositoryError::Persistence`] when the write fails.
    async fn store(&self, state: &OAuthState) -> StateRepositoryResult<()>;

    /// Removes and returns the state record matching token, user and
    /// platform.
    ///
    /// The removal is unconditional once a record matches, regardless of
    /// expiry, so a token can never be presented twice. Returns `None` when
    /// no record matches.
    async fn take(
        &self,
        token: &str,
        user_id: UserId,
        platform: Platform,
    ) -> StateRepositoryResult<Option<OAuthState>>;
}

/// Errors returned by state repository implementations.
#[derive(Debug, Clone, Error)]
pub enum StateRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StateRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

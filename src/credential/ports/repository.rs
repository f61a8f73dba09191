//! Repository port for credential persistence.

use crate::credential::domain::{PlatformCredential, UserId};
use crate::hosting::domain::Platform;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for credential repository operations.
pub type CredentialRepositoryResult<T> = Result<T, CredentialRepositoryError>;

/// Credential persistence contract.
///
/// Storage is keyed on the unique `(user, platform)` pair; concurrent
/// connect calls are made idempotent by the upsert rather than by locking.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Inserts the credential or replaces the existing row for the same
    /// `(user, platform)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialRepositoryError::Persistence`] when the write
    /// fails.
    async fn upsert(&self, credential: &PlatformCredential) -> CredentialRepositoryResult<()>;

    /// Finds the credential for a `(user, platform)` pair.
    ///
    /// Returns `None` when the platform is not connected.
    async fn find(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> CredentialRepositoryResult<Option<PlatformCredential>>;

    /// Returns all credentials stored for a user.
    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> CredentialRepositoryResult<Vec<PlatformCredential>>;

    /// Deletes the credential for a `(user, platform)` pair.
    ///
    /// Returns `false` when no credential was stored.
    async fn delete(&self, user_id: UserId, platform: Platform)
    -> CredentialRepositoryResult<bool>;
}

/// Errors returned by credential repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CredentialRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CredentialRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

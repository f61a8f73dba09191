//! In-memory credential repository for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::credential::domain::{PlatformCredential, UserId};
use crate::credential::ports::{
    CredentialRepository, CredentialRepositoryError, CredentialRepositoryResult,
};
use crate::hosting::domain::Platform;

/// Thread-safe in-memory credential repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialRepository {
    state: Arc<RwLock<HashMap<(UserId, Platform), PlatformCredential>>>,
}

impl InMemoryCredentialRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn upsert(&self, credential: &PlatformCredential) -> CredentialRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CredentialRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(
            (credential.user_id(), credential.platform()),
            credential.clone(),
        );
        Ok(())
    }

    async fn find(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> CredentialRepositoryResult<Option<PlatformCredential>> {
        let state = self.state.read().map_err(|err| {
            CredentialRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&(user_id, platform)).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> CredentialRepositoryResult<Vec<PlatformCredential>> {
        let state = self.state.read().map_err(|err| {
            CredentialRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .values()
            .filter(|credential| credential.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn delete(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> CredentialRepositoryResult<bool> {
        let mut state = self.state.write().map_err(|err| {
            CredentialRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.remove(&(user_id, platform)).is_some())
    }
}

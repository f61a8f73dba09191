//! In-memory repository directory for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::credential::domain::UserId;
use crate::project::domain::{RepositoryId, SourceRepository};
use crate::project::ports::{
    ProjectRepositoryError, ProjectRepositoryResult, RepositoryDirectory,
};

/// Thread-safe in-memory repository directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepositoryDirectory {
    state: Arc<RwLock<HashMap<RepositoryId, SourceRepository>>>,
}

impl InMemoryRepositoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a repository projection.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] when the directory
    /// lock is poisoned.
    pub fn insert(&self, repository: SourceRepository) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(repository.id, repository);
        Ok(())
    }
}

#[async_trait]
impl RepositoryDirectory for InMemoryRepositoryDirectory {
    async fn find(
        &self,
        repository_id: RepositoryId,
    ) -> ProjectRepositoryResult<Option<SourceRepository>> {
        let state = self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&repository_id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> ProjectRepositoryResult<Vec<SourceRepository>> {
        let state = self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .values()
            .filter(|repository| repository.user_id == user_id)
            .cloned()
            .collect())
    }
}

//! In-memory OAuth state repository for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::credential::domain::UserId;
use crate::hosting::domain::Platform;
use crate::oauth::domain::OAuthState;
use crate::oauth::ports::{StateRepository, StateRepositoryError, StateRepositoryResult};

/// Thread-safe in-memory OAuth state repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateRepository {
    state: Arc<RwLock<HashMap<String, OAuthState>>>,
}

impl InMemoryStateRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateRepository for InMemoryStateRepository {
    async fn store(&self, state: &OAuthState) -> StateRepositoryResult<()> {
        let mut records = self.state.write().map_err(|err| {
            StateRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        records.insert(state.token().to_owned(), state.clone());
        Ok(())
    }

    async fn take(
        &self,
        token: &str,
        user_id: UserId,
        platform: Platform,
    ) -> StateRepositoryResult<Option<OAuthState>> {
        let mut records = self.state.write().map_err(|err| {
            StateRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let matches = records
            .get(token)
            .is_some_and(|record| record.user_id() == user_id && record.platform() == platform);
        if !matches {
            return Ok(None);
        }
        Ok(records.remove(token))
    }
}

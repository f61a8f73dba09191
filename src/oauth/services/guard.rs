//! Anti-CSRF state guard for the authorization-code flow.

use crate::credential::domain::UserId;
use crate::hosting::domain::Platform;
use crate::oauth::domain::OAuthState;
use crate::oauth::ports::{StateRepository, StateRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Outcome of presenting a state token at the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateVerdict {
    /// The token matched and was within its lifetime.
    Valid,
    /// The token matched but had expired; it was still consumed.
    Expired,
    /// No token matched the `(state, user, platform)` triple.
    Unknown,
}

impl StateVerdict {
    /// Returns whether the flow may proceed to the code exchange.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Service-level errors for state guard operations.
#[derive(Debug, Error)]
pub enum StateGuardError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] StateRepositoryError),
}

/// Result type for state guard operations.
pub type StateGuardResult<T> = Result<T, StateGuardError>;

/// Issues and consumes single-use, expiring CSRF state tokens.
#[derive(Clone)]
pub struct StateGuardService {
    repository: Arc<dyn StateRepository>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl StateGuardService {
    /// Creates a new state guard service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn StateRepository>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self { repository, clock }
    }

    /// Issues a state token for a user connecting a platform.
    ///
    /// # Errors
    ///
    /// Returns [`StateGuardError`] when the token cannot be persisted.
    pub async fn issue(&self, user_id: UserId, platform: Platform) -> StateGuardResult<OAuthState> {
        let state = OAuthState::issue(user_id, platform, &*self.clock);
        self.repository.store(&state).await?;
        Ok(state)
    }

    /// Consumes a state token presented at the callback.
    ///
    /// A matching record is deleted whether or not it is still within its
    /// lifetime, so a token can never be replayed.
    ///
    /// # Errors
    ///
    /// Returns [`StateGuardError`] when the repository lookup fails.
    pub async fn consume(
        &self,
        token: &str,
        user_id: UserId,
        platform: Platform,
    ) -> StateGuardResult<StateVerdict> {
        let Some(state) = self.repository.take(token, user_id, platform).await? else {
            debug!(%platform, "oauth state token did not match any record");
            return Ok(StateVerdict::Unknown);
        };

        if state.is_expired(self.clock.utc()) {
            debug!(%platform, "oauth state token was expired on presentation");
            return Ok(StateVerdict::Expired);
        }
        Ok(StateVerdict::Valid)
    }
}

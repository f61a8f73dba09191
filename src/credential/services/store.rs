//! Service layer for platform connection lifecycle.

use crate::credential::domain::{PlatformCredential, UserId};
use crate::credential::ports::{
    ActiveProjectProbe, ActiveProjectProbeError, CredentialRepository, CredentialRepositoryError,
    TokenCipher, TokenCipherError,
};
use crate::hosting::domain::Platform;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for connecting a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectPlatformRequest {
    platform: Platform,
    access_token: String,
    team_id: Option<String>,
    account_id: Option<String>,
}

impl ConnectPlatformRequest {
    /// Creates a connect request with the platform access token.
    #[must_use]
    pub fn new(platform: Platform, access_token: impl Into<String>) -> Self {
        Self {
            platform,
            access_token: access_token.into(),
            team_id: None,
            account_id: None,
        }
    }

    /// Sets the team identifier.
    #[must_use]
    pub fn with_team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Sets the account identifier.
    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Returns the target platform.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

/// Service-level errors for credential operations.
#[derive(Debug, Error)]
pub enum CredentialServiceError {
    /// Disconnect was blocked because active projects still use the platform.
    #[error("cannot disconnect {platform} while active deployment projects exist")]
    ActiveProjectsExist {
        /// Platform the user tried to disconnect.
        platform: Platform,
    },

    /// The platform is not connected for this user.
    #[error("{platform} is not connected")]
    NotConnected {
        /// Platform that was expected to be connected.
        platform: Platform,
    },

    /// Token cipher failure.
    #[error(transparent)]
    Cipher(#[from] TokenCipherError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CredentialRepositoryError),

    /// Active-project probe failed.
    #[error(transparent)]
    Probe(#[from] ActiveProjectProbeError),
}

/// Result type for credential service operations.
pub type CredentialServiceResult<T> = Result<T, CredentialServiceError>;

/// Platform connection store.
///
/// All tokens pass through the injected [`TokenCipher`] on their way to and
/// from the repository; callers only ever see plaintext.
#[derive(Clone)]
pub struct CredentialService {
    repository: Arc<dyn CredentialRepository>,
    projects: Arc<dyn ActiveProjectProbe>,
    cipher: Arc<dyn TokenCipher>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl CredentialService {
    /// Creates a new credential service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn CredentialRepository>,
        projects: Arc<dyn ActiveProjectProbe>,
        cipher: Arc<dyn TokenCipher>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            projects,
            cipher,
            clock,
        }
    }

    /// Connects a platform, storing or rotating the credential.
    ///
    /// Calling connect twice for the same `(user, platform)` pair keeps one
    /// row and the second call's token.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialServiceError`] when sealing or persistence fails.
    pub async fn connect(
        &self,
        user_id: UserId,
        request: ConnectPlatformRequest,
    ) -> CredentialServiceResult<PlatformCredential> {
        let ConnectPlatformRequest {
            platform,
            access_token,
            team_id,
            account_id,
        } = request;

        let credential = match self.repository.find(user_id, platform).await? {
            Some(existing) => {
                let mut rotated = existing;
                rotated.rotate(access_token, team_id, account_id, &*self.clock);
                rotated
            }
            None => {
                let mut created =
                    PlatformCredential::new(user_id, platform, access_token, &*self.clock);
                if let Some(team) = team_id {
                    created = created.with_team_id(team);
                }
                if let Some(account) = account_id {
                    created = created.with_account_id(account);
                }
                created
            }
        };

        let sealed = self.cipher.seal(credential.access_token())?;
        self.repository
            .upsert(&credential.clone().with_access_token(sealed))
            .await?;
        Ok(credential)
    }

    /// Returns the credential for a `(user, platform)` pair with the token
    /// opened.
    ///
    /// Returns `Ok(None)` when the platform is not connected.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialServiceError`] when lookup or opening fails.
    pub async fn get(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> CredentialServiceResult<Option<PlatformCredential>> {
        match self.repository.find(user_id, platform).await? {
            Some(credential) => {
                let token = self.cipher.open(credential.access_token())?;
                Ok(Some(credential.with_access_token(token)))
            }
            None => Ok(None),
        }
    }

    /// Returns the credential for a `(user, platform)` pair, erroring when
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialServiceError::NotConnected`] when the platform is
    /// not connected.
    pub async fn require(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> CredentialServiceResult<PlatformCredential> {
        self.get(user_id, platform)
            .await?
            .ok_or(CredentialServiceError::NotConnected { platform })
    }

    /// Lists all connected platforms for a user, tokens opened.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialServiceError`] when lookup or opening fails.
    pub async fn list(&self, user_id: UserId) -> CredentialServiceResult<Vec<PlatformCredential>> {
        let mut opened = Vec::new();
        for credential in self.repository.list_for_user(user_id).await? {
            let token = self.cipher.open(credential.access_token())?;
            opened.push(credential.with_access_token(token));
        }
        Ok(opened)
    }

    /// Disconnects a platform.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialServiceError::ActiveProjectsExist`] while active
    /// projects reference the platform, and
    /// [`CredentialServiceError::NotConnected`] when no credential exists.
    pub async fn disconnect(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> CredentialServiceResult<()> {
        if self.projects.has_active_projects(user_id, platform).await? {
            return Err(CredentialServiceError::ActiveProjectsExist { platform });
        }
        if self.repository.delete(user_id, platform).await? {
            Ok(())
        } else {
            Err(CredentialServiceError::NotConnected { platform })
        }
    }
}

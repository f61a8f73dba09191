//! Platform credential aggregate root.

use super::UserId;
use crate::hosting::domain::{Platform, ProviderCredentials};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Access token connecting one user to one hosting platform.
///
/// Exactly one credential exists per `(user, platform)` pair; reconnecting
/// rotates the token in place rather than adding a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCredential {
    user_id: UserId,
    platform: Platform,
    access_token: String,
    team_id: Option<String>,
    account_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCredentialData {
    /// Persisted owning user.
    pub user_id: UserId,
    /// Persisted platform.
    pub platform: Platform,
    /// Persisted access token, as stored.
    pub access_token: String,
    /// Persisted team identifier, if any.
    pub team_id: Option<String>,
    /// Persisted account identifier, if any.
    pub account_id: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PlatformCredential {
    /// Creates a credential for a newly connected platform.
    #[must_use]
    pub fn new(
        user_id: UserId,
        platform: Platform,
        access_token: impl Into<String>,
        clock: &dyn Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            user_id,
            platform,
            access_token: access_token.into(),
            team_id: None,
            account_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a credential from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCredentialData) -> Self {
        Self {
            user_id: data.user_id,
            platform: data.platform,
            access_token: data.access_token,
            team_id: data.team_id,
            account_id: data.account_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
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

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the connected platform.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the access token in its current representation.
    ///
    /// Whether this is plaintext or sealed ciphertext depends on which side
    /// of the token cipher the value is on.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the team identifier, if any.
    #[must_use]
    pub fn team_id(&self) -> Option<&str> {
        self.team_id.as_deref()
    }

    /// Returns the account identifier, if any.
    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces token and scoping identifiers on reconnect.
    pub fn rotate(
        &mut self,
        access_token: impl Into<String>,
        team_id: Option<String>,
        account_id: Option<String>,
        clock: &dyn Clock,
    ) {
        self.access_token = access_token.into();
        self.team_id = team_id;
        self.account_id = account_id;
        self.updated_at = clock.utc();
    }

    /// Replaces the stored token representation.
    ///
    /// Used by the credential service to swap between plaintext and sealed
    /// forms around persistence.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = access_token.into();
        self
    }

    /// Projects the credential into the adapter-facing form.
    #[must_use]
    pub fn provider_credentials(&self) -> ProviderCredentials {
        let mut credentials = ProviderCredentials::new(self.access_token.clone());
        if let Some(team) = &self.team_id {
            credentials = credentials.with_team_id(team.clone());
        }
        if let Some(account) = &self.account_id {
            credentials = credentials.with_account_id(account.clone());
        }
        credentials
    }
}

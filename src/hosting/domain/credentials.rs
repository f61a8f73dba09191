//! Authorization material passed to provider adapters.

use serde::{Deserialize, Serialize};

/// Access token and optional scoping identifiers for platform API calls.
///
/// This is the adapter-facing projection of a stored credential: the token is
/// already decrypted and the team/account identifiers are whatever the
/// platform needs to scope requests (Vercel teams, Cloudflare accounts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredentials {
    access_token: String,
    team_id: Option<String>,
    account_id: Option<String>,
}

impl ProviderCredentials {
    /// Creates credentials from a bare access token.
    #[must_use]
    pub const fn new(access_token: String) -> Self {
        Self {
            access_token,
            team_id: None,
            account_id: None,
        }
    }

    /// Sets the team identifier used to scope requests.
    #[must_use]
    pub fn with_team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Sets the account identifier used to scope requests.
    #[must_use]
    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    /// Returns the bearer token for API calls.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the team identifier, if the platform uses one.
    #[must_use]
    pub fn team_id(&self) -> Option<&str> {
        self.team_id.as_deref()
    }

    /// Returns the account identifier, if the platform uses one.
    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref()
    }
}

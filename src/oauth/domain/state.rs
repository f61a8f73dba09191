//! Single-use anti-CSRF state tokens for the authorization-code flow.

use crate::credential::domain::UserId;
use crate::hosting::domain::Platform;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifetime of an issued state token.
pub const STATE_TTL: TimeDelta = TimeDelta::minutes(10);

/// Bytes of entropy behind each state token.
const STATE_TOKEN_BYTES: usize = 32;

/// Unique identifier for a persisted state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(Uuid);

impl StateId {
    /// Creates a new random state identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a state identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for StateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One issued state token, bound to the user and platform that requested it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthState {
    id: StateId,
    user_id: UserId,
    platform: Platform,
    token: String,
    expires_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted state record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStateData {
    /// Persisted record identifier.
    pub id: StateId,
    /// Persisted requesting user.
    pub user_id: UserId,
    /// Persisted target platform.
    pub platform: Platform,
    /// Persisted opaque token.
    pub token: String,
    /// Persisted expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

impl OAuthState {
    /// Issues a fresh state token with 32 bytes of entropy and the standard
    /// TTL.
    #[must_use]
    pub fn issue(user_id: UserId, platform: Platform, clock: &dyn Clock) -> Self {
        let mut entropy = [0_u8; STATE_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut entropy);

        Self {
            id: StateId::new(),
            user_id,
            platform,
            token: hex::encode(entropy),
            expires_at: clock.utc() + STATE_TTL,
        }
    }

    /// Reconstructs a state record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedStateData) -> Self {
        Self {
            id: data.id,
            user_id: data.user_id,
            platform: data.platform,
            token: data.token,
            expires_at: data.expires_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> StateId {
        self.id
    }

    /// Returns the requesting user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the target platform.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the opaque token embedded in the authorization URL.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the expiry timestamp.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns whether the token has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

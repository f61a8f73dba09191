//! Session authentication port for the HTTP surface.
//!
//! Session handling itself is outside this core; handlers only need a way
//! to turn a bearer token into a user identity.

use crate::credential::domain::UserId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Resolves bearer tokens to user identities.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the user for a bearer token, or `None` for invalid sessions.
    async fn authenticate(&self, bearer_token: &str) -> Option<UserId>;
}

/// Fixed token-to-user mapping for tests and local development.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: Arc<RwLock<HashMap<String, UserId>>>,
}

impl StaticTokenAuthenticator {
    /// Creates an empty authenticator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bearer token for a user.
    pub fn insert(&self, token: impl Into<String>, user_id: UserId) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.insert(token.into(), user_id);
        }
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, bearer_token: &str) -> Option<UserId> {
        self.tokens
            .read()
            .ok()
            .and_then(|tokens| tokens.get(bearer_token).copied())
    }
}

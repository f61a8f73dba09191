//! Diesel row models for OAuth state persistence.

use super::schema::oauth_states;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for state records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = oauth_states)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OAuthStateRow {
    /// Internal record identifier.
    pub id: uuid::Uuid,
    /// Requesting user.
    pub user_id: uuid::Uuid,
    /// Platform identifier.
    pub platform: String,
    /// Opaque single-use token.
    pub state_token: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Insert model for state records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = oauth_states)]
pub struct NewOAuthStateRow {
    /// Internal record identifier.
    pub id: uuid::Uuid,
    /// Requesting user.
    pub user_id: uuid::Uuid,
    /// Platform identifier.
    pub platform: String,
    /// Opaque single-use token.
    pub state_token: String,
    /// Expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

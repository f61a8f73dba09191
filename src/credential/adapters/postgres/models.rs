//! Diesel row models for credential persistence.

use super::schema::platform_credentials;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for credential records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = platform_credentials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CredentialRow {
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Platform identifier.
    pub platform: String,
    /// Stored access token.
    pub access_token: String,
    /// Optional team identifier.
    pub team_id: Option<String>,
    /// Optional account identifier.
    pub account_id: Option<String>,
    /// Connection timestamp.
    pub created_at: DateTime<Utc>,
    /// Last rotation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for credential records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = platform_credentials)]
pub struct NewCredentialRow {
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Platform identifier.
    pub platform: String,
    /// Stored access token.
    pub access_token: String,
    /// Optional team identifier.
    pub team_id: Option<String>,
    /// Optional account identifier.
    pub account_id: Option<String>,
    /// Connection timestamp.
    pub created_at: DateTime<Utc>,
    /// Last rotation timestamp.
    pub updated_at: DateTime<Utc>,
}

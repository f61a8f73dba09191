//! Diesel row models for deployment history persistence.

use super::schema::deployment_history;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for history records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deployment_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Internal record identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Platform-assigned deployment identifier.
    pub external_deployment_id: String,
    /// Lifecycle status.
    pub status: String,
    /// Deployment URL, when known.
    pub deployment_url: Option<String>,
    /// Preview URL, when known.
    pub preview_url: Option<String>,
    /// Commit SHA, when known.
    pub commit_sha: Option<String>,
    /// Commit message, when known.
    pub commit_message: Option<String>,
    /// What initiated the record.
    pub triggered_by: String,
    /// Platform-supplied failure message, when any.
    pub error_message: Option<String>,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// Completion timestamp, when finished.
    pub completed_at: Option<DateTime<Utc>>,
}

/// Insert model for history records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deployment_history)]
pub struct NewHistoryRow {
    /// Internal record identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Platform-assigned deployment identifier.
    pub external_deployment_id: String,
    /// Lifecycle status.
    pub status: String,
    /// Deployment URL, when known.
    pub deployment_url: Option<String>,
    /// Preview URL, when known.
    pub preview_url: Option<String>,
    /// Commit SHA, when known.
    pub commit_sha: Option<String>,
    /// Commit message, when known.
    pub commit_message: Option<String>,
    /// What initiated the record.
    pub triggered_by: String,
    /// Platform-supplied failure message, when any.
    pub error_message: Option<String>,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// Completion timestamp, when finished.
    pub completed_at: Option<DateTime<Utc>>,
}

//! Diesel row models for project persistence.

use super::schema::{deployment_projects, repositories};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deployment_projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Internal project identifier.
    pub id: uuid::Uuid,
    /// Backing source repository.
    pub repository_id: uuid::Uuid,
    /// Platform identifier.
    pub platform: String,
    /// Platform-assigned project identifier.
    pub external_project_id: String,
    /// Project name on the platform.
    pub project_name: String,
    /// Production URL, when assigned.
    pub production_url: Option<String>,
    /// Ordered custom domain list as a JSON array.
    pub custom_domains: Value,
    /// Activation state.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deployment_projects)]
pub struct NewProjectRow {
    /// Internal project identifier.
    pub id: uuid::Uuid,
    /// Backing source repository.
    pub repository_id: uuid::Uuid,
    /// Platform identifier.
    pub platform: String,
    /// Platform-assigned project identifier.
    pub external_project_id: String,
    /// Project name on the platform.
    pub project_name: String,
    /// Production URL, when assigned.
    pub production_url: Option<String>,
    /// Ordered custom domain list as a JSON array.
    pub custom_domains: Value,
    /// Activation state.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for repository projections.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = repositories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RepositoryRow {
    /// Repository identifier.
    pub id: uuid::Uuid,
    /// Owning user.
    pub user_id: uuid::Uuid,
    /// Repository owner login.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

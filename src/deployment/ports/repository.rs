//! Repository port for deployment history persistence.

use crate::deployment::domain::{DeploymentHistory, DeploymentId};
use crate::project::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for history repository operations.
pub type DeploymentHistoryResult<T> = Result<T, DeploymentHistoryError>;

/// Deployment history persistence contract.
#[async_trait]
pub trait DeploymentHistoryRepository: Send + Sync {
    /// Appends a new deployment record.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentHistoryError::DuplicateDeployment`] when a record
    /// already exists for the same project and external deployment id.
    async fn insert(&self, history: &DeploymentHistory) -> DeploymentHistoryResult<()>;

    /// Persists status updates to an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentHistoryError::NotFound`] when the record does not
    /// exist.
    async fn update(&self, history: &DeploymentHistory) -> DeploymentHistoryResult<()>;

    /// Finds a record by internal identifier.
    async fn find_by_id(
        &self,
        id: DeploymentId,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>>;

    /// Finds a record by its platform-assigned deployment identifier.
    async fn find_by_external_id(
        &self,
        project_id: ProjectId,
        external_deployment_id: &str,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>>;

    /// Returns the most recently started record for a project.
    async fn find_latest_for_project(
        &self,
        project_id: ProjectId,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>>;

    /// Returns all records for a project, most recent first.
    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> DeploymentHistoryResult<Vec<DeploymentHistory>>;

    /// Deletes all records for a project.
    ///
    /// Only used when the owning project is deleted; history is otherwise
    /// append-and-update.
    async fn delete_for_project(&self, project_id: ProjectId) -> DeploymentHistoryResult<usize>;
}

/// Errors returned by history repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DeploymentHistoryError {
    /// A record already exists for the external deployment id.
    #[error("duplicate deployment record for external id {external_deployment_id}")]
    DuplicateDeployment {
        /// Owning project.
        project_id: ProjectId,
        /// Platform-assigned deployment identifier.
        external_deployment_id: String,
    },

    /// The record was not found.
    #[error("deployment record not found: {0}")]
    NotFound(DeploymentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DeploymentHistoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

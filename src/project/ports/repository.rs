//! Repository port for deployment project persistence.

use crate::credential::domain::UserId;
use crate::hosting::domain::Platform;
use crate::project::domain::{DeploymentProject, ProjectId, RepositoryId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Deployment project persistence contract.
///
/// Uniqueness of `(repository, platform)` is the repository's concern:
/// `upsert` replaces the existing row for the pair, keeping re-setup
/// idempotent without locking.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Inserts the project or replaces the row for the same
    /// `(repository, platform)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] when the write fails.
    async fn upsert(&self, project: &DeploymentProject) -> ProjectRepositoryResult<()>;

    /// Persists changes to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn update(&self, project: &DeploymentProject) -> ProjectRepositoryResult<()>;

    /// Finds a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<DeploymentProject>>;

    /// Finds the project for a `(repository, platform)` pair.
    async fn find_by_repository(
        &self,
        repository_id: RepositoryId,
        platform: Platform,
    ) -> ProjectRepositoryResult<Option<DeploymentProject>>;

    /// Finds a project by the platform-assigned external identifier.
    ///
    /// Used by webhook dispatch, which only knows platform-side identifiers.
    async fn find_by_external_id(
        &self,
        platform: Platform,
        external_project_id: &str,
    ) -> ProjectRepositoryResult<Option<DeploymentProject>>;

    /// Returns all projects backed by the given repositories.
    async fn list_for_repositories(
        &self,
        repository_ids: &[RepositoryId],
    ) -> ProjectRepositoryResult<Vec<DeploymentProject>>;

    /// Deletes a project record.
    ///
    /// Returns `false` when no record existed.
    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Directory port resolving source repositories and their owners.
///
/// The repository store itself belongs to the blog-content side of the
/// application; this port exposes just enough for ownership joins.
#[async_trait]
pub trait RepositoryDirectory: Send + Sync {
    /// Finds a repository by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] when the lookup fails.
    async fn find(
        &self,
        repository_id: RepositoryId,
    ) -> ProjectRepositoryResult<Option<crate::project::domain::SourceRepository>>;

    /// Returns all repositories owned by a user.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] when the lookup fails.
    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> ProjectRepositoryResult<Vec<crate::project::domain::SourceRepository>>;
}

//! In-memory project repository for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::hosting::domain::Platform;
use crate::project::domain::{DeploymentProject, ProjectId, RepositoryId};
use crate::project::ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    state: Arc<RwLock<InMemoryProjectState>>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    projects: HashMap<ProjectId, DeploymentProject>,
    pair_index: HashMap<(RepositoryId, Platform), ProjectId>,
}

impl InMemoryProjectRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn upsert(&self, project: &DeploymentProject) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let pair = (project.repository_id(), project.platform());

        // Replacing the pair's existing row keeps re-setup idempotent.
        if let Some(&existing_id) = state.pair_index.get(&pair)
            && existing_id != project.id()
        {
            state.projects.remove(&existing_id);
        }
        state.pair_index.insert(pair, project.id());
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &DeploymentProject) -> ProjectRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.projects.contains_key(&project.id()) {
            return Err(ProjectRepositoryError::NotFound(project.id()));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ProjectId,
    ) -> ProjectRepositoryResult<Option<DeploymentProject>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.projects.get(&id).cloned())
    }

    async fn find_by_repository(
        &self,
        repository_id: RepositoryId,
        platform: Platform,
    ) -> ProjectRepositoryResult<Option<DeploymentProject>> {
        let state = self.state.read().map_err(lock_error)?;
        let project = state
            .pair_index
            .get(&(repository_id, platform))
            .and_then(|id| state.projects.get(id))
            .cloned();
        Ok(project)
    }

    async fn find_by_external_id(
        &self,
        platform: Platform,
        external_project_id: &str,
    ) -> ProjectRepositoryResult<Option<DeploymentProject>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .projects
            .values()
            .find(|project| {
                project.platform() == platform
                    && project.external_project_id() == external_project_id
            })
            .cloned())
    }

    async fn list_for_repositories(
        &self,
        repository_ids: &[RepositoryId],
    ) -> ProjectRepositoryResult<Vec<DeploymentProject>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut projects: Vec<DeploymentProject> = state
            .projects
            .values()
            .filter(|project| repository_ids.contains(&project.repository_id()))
            .cloned()
            .collect();
        projects.sort_by_key(DeploymentProject::created_at);
        Ok(projects)
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        let Some(project) = state.projects.remove(&id) else {
            return Ok(false);
        };
        state
            .pair_index
            .remove(&(project.repository_id(), project.platform()));
        Ok(true)
    }
}

//! Active-project probe backing the credential disconnect guard.

use crate::credential::domain::UserId;
use crate::credential::ports::{
    ActiveProjectProbe, ActiveProjectProbeError, ActiveProjectProbeResult,
};
use crate::hosting::domain::Platform;
use crate::project::ports::{ProjectRepository, RepositoryDirectory};
use async_trait::async_trait;
use std::sync::Arc;

/// Answers the credential store's "any active projects left?" question from
/// project persistence.
#[derive(Clone)]
pub struct ProjectActivityProbe {
    projects: Arc<dyn ProjectRepository>,
    directory: Arc<dyn RepositoryDirectory>,
}

impl ProjectActivityProbe {
    /// Creates a probe over project persistence.
    #[must_use]
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        directory: Arc<dyn RepositoryDirectory>,
    ) -> Self {
        Self {
            projects,
            directory,
        }
    }
}

#[async_trait]
impl ActiveProjectProbe for ProjectActivityProbe {
    async fn has_active_projects(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> ActiveProjectProbeResult<bool> {
        let repositories = self
            .directory
            .list_for_user(user_id)
            .await
            .map_err(ActiveProjectProbeError::new)?;
        let ids: Vec<_> = repositories.iter().map(|repository| repository.id).collect();
        let projects = self
            .projects
            .list_for_repositories(&ids)
            .await
            .map_err(ActiveProjectProbeError::new)?;
        Ok(projects
            .iter()
            .any(|project| project.platform() == platform && project.is_active()))
    }
}

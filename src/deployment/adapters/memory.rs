//! In-memory deployment history repository for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::deployment::domain::{DeploymentHistory, DeploymentId};
use crate::deployment::ports::{
    DeploymentHistoryError, DeploymentHistoryRepository, DeploymentHistoryResult,
};
use crate::project::domain::ProjectId;

/// Thread-safe in-memory deployment history repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeploymentHistoryRepository {
    state: Arc<RwLock<HashMap<DeploymentId, DeploymentHistory>>>,
}

impl InMemoryDeploymentHistoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> DeploymentHistoryError {
    DeploymentHistoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DeploymentHistoryRepository for InMemoryDeploymentHistoryRepository {
    async fn insert(&self, history: &DeploymentHistory) -> DeploymentHistoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let duplicate = state.values().any(|record| {
            record.project_id() == history.project_id()
                && record.external_deployment_id() == history.external_deployment_id()
        });
        if duplicate {
            return Err(DeploymentHistoryError::DuplicateDeployment {
                project_id: history.project_id(),
                external_deployment_id: history.external_deployment_id().to_owned(),
            });
        }
        state.insert(history.id(), history.clone());
        Ok(())
    }

    async fn update(&self, history: &DeploymentHistory) -> DeploymentHistoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.contains_key(&history.id()) {
            return Err(DeploymentHistoryError::NotFound(history.id()));
        }
        state.insert(history.id(), history.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: DeploymentId,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn find_by_external_id(
        &self,
        project_id: ProjectId,
        external_deployment_id: &str,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .find(|record| {
                record.project_id() == project_id
                    && record.external_deployment_id() == external_deployment_id
            })
            .cloned())
    }

    async fn find_latest_for_project(
        &self,
        project_id: ProjectId,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .filter(|record| record.project_id() == project_id)
            .max_by_key(|record| record.started_at())
            .cloned())
    }

    async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> DeploymentHistoryResult<Vec<DeploymentHistory>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut records: Vec<DeploymentHistory> = state
            .values()
            .filter(|record| record.project_id() == project_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| std::cmp::Reverse(record.started_at()));
        Ok(records)
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> DeploymentHistoryResult<usize> {
        let mut state = self.state.write().map_err(lock_error)?;
        let before = state.len();
        state.retain(|_, record| record.project_id() != project_id);
        Ok(before - state.len())
    }
}

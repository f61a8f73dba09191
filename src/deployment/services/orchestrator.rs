//! Service layer for triggering deployments and tracking their lifecycle.

use crate::credential::domain::UserId;
use crate::credential::services::{CredentialService, CredentialServiceError};
use crate::deployment::domain::{DeploymentHistory, TriggerSource};
use crate::deployment::ports::{DeploymentHistoryError, DeploymentHistoryRepository};
use crate::hosting::domain::{DeployOutcome, DeployRequest, LogPage, Platform};
use crate::hosting::error::ProviderError;
use crate::hosting::ports::HostingProvider;
use crate::hosting::registry::ProviderRegistry;
use crate::project::domain::{DeploymentProject, ProjectId};
use crate::project::ports::{ProjectRepository, ProjectRepositoryError, RepositoryDirectory};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Request payload for triggering a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDeployRequest {
    branch: Option<String>,
    commit_sha: Option<String>,
    commit_message: Option<String>,
    production: bool,
}

impl TriggerDeployRequest {
    /// Creates a production deploy request for the default branch.
    #[must_use]
    pub const fn production() -> Self {
        Self {
            branch: None,
            commit_sha: None,
            commit_message: None,
            production: true,
        }
    }

    /// Creates a preview deploy request for the default branch.
    #[must_use]
    pub const fn preview() -> Self {
        Self {
            branch: None,
            commit_sha: None,
            commit_message: None,
            production: false,
        }
    }

    /// Overrides the branch to deploy.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Pins the deploy to a commit.
    #[must_use]
    pub fn with_commit_sha(mut self, sha: impl Into<String>) -> Self {
        self.commit_sha = Some(sha.into());
        self
    }

    /// Records the commit message alongside the attempt.
    #[must_use]
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }
}

/// Outcome of a deploy trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggeredDeployment {
    /// The platform's immediate answer.
    pub outcome: DeployOutcome,
    /// The recorded history row, absent when bookkeeping failed.
    pub history: Option<DeploymentHistory>,
}

/// Service-level errors for deployment operations.
#[derive(Debug, Error)]
pub enum DeploymentServiceError {
    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The requesting user does not own the backing repository.
    #[error("not authorized to manage this project")]
    NotOwner,

    /// The project has no recorded deployments to resolve against.
    #[error("no deployments recorded for project {0}")]
    NoDeployments(ProjectId),

    /// The platform has no adapter bound in the registry.
    #[error("unsupported platform: {0}")]
    UnknownPlatform(Platform),

    /// Provider adapter failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// History persistence failure.
    #[error(transparent)]
    History(#[from] DeploymentHistoryError),

    /// Project persistence failure.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),

    /// Credential store failure, including missing platform connection.
    #[error(transparent)]
    Credential(#[from] CredentialServiceError),
}

/// Result type for deployment service operations.
pub type DeploymentServiceResult<T> = Result<T, DeploymentServiceError>;

/// Deployment orchestration service.
///
/// Build and publish execution is entirely the platform's: this service
/// only triggers, polls and records. It never invents a status transition;
/// the history row mirrors what the platform reports, guarded so terminal
/// outcomes are not reopened by stale reports.
#[derive(Clone)]
pub struct DeploymentService {
    histories: Arc<dyn DeploymentHistoryRepository>,
    projects: Arc<dyn ProjectRepository>,
    directory: Arc<dyn RepositoryDirectory>,
    credentials: CredentialService,
    providers: ProviderRegistry,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl DeploymentService {
    /// Creates a new deployment service.
    #[must_use]
    pub fn new(
        histories: Arc<dyn DeploymentHistoryRepository>,
        projects: Arc<dyn ProjectRepository>,
        directory: Arc<dyn RepositoryDirectory>,
        credentials: CredentialService,
        providers: ProviderRegistry,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            histories,
            projects,
            directory,
            credentials,
            providers,
            clock,
        }
    }

    /// Triggers a deployment for a project.
    ///
    /// The history insert is bookkeeping: when it fails the deployment has
    /// already been triggered upstream, so the failure is logged and the
    /// trigger still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentServiceError`] when ownership, connection or the
    /// provider trigger fails.
    pub async fn trigger(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        request: TriggerDeployRequest,
    ) -> DeploymentServiceResult<TriggeredDeployment> {
        let project = self.owned_project(user_id, project_id).await?;
        let credential = self
            .credentials
            .require(user_id, project.platform())
            .await?
            .provider_credentials();
        let provider = self.provider(project.platform())?;

        let branch = request.branch.unwrap_or_else(|| "main".to_owned());
        let mut deploy_request = if request.production {
            DeployRequest::production(branch)
        } else {
            DeployRequest::preview(branch)
        };
        if let Some(sha) = &request.commit_sha {
            deploy_request = deploy_request.with_commit_sha(sha.clone());
        }

        let outcome = provider
            .deploy(&credential, project.external_project_id(), &deploy_request)
            .await?;

        let mut history = DeploymentHistory::new(
            project_id,
            &outcome.external_deployment_id,
            TriggerSource::Api,
            &*self.clock,
        );
        if let Some(url) = &outcome.deployment_url {
            history = history.with_deployment_url(url.clone());
        }
        if let Some(url) = &outcome.preview_url {
            history = history.with_preview_url(url.clone());
        }
        if let Some(sha) = request.commit_sha {
            history = history.with_commit_sha(sha);
        }
        if let Some(message) = request.commit_message {
            history = history.with_commit_message(message);
        }

        let history = match self.histories.insert(&history).await {
            Ok(()) => Some(history),
            Err(err) => {
                warn!(%project_id, error = %err, "failed to record deployment history");
                None
            }
        };

        Ok(TriggeredDeployment { outcome, history })
    }

    /// Polls the platform for a deployment's status and reconciles the
    /// history row.
    ///
    /// With no explicit deployment id the most recently started record is
    /// used. Only fields the platform returned overwrite local state, and a
    /// stale non-terminal report after completion is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentServiceError::NoDeployments`] when nothing can be
    /// resolved, or an upstream error from the poll.
    pub async fn status(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        external_deployment_id: Option<&str>,
    ) -> DeploymentServiceResult<DeploymentHistory> {
        let project = self.owned_project(user_id, project_id).await?;
        let mut history = self
            .resolve_history(project_id, external_deployment_id)
            .await?;

        let credential = self
            .credentials
            .require(user_id, project.platform())
            .await?
            .provider_credentials();
        let provider = self.provider(project.platform())?;
        let report = provider
            .deployment_status(
                &credential,
                project.external_project_id(),
                history.external_deployment_id(),
            )
            .await?;

        if history.apply_report(&report, &*self.clock) {
            if let Err(err) = self.histories.update(&history).await {
                warn!(%project_id, error = %err, "failed to persist deployment status update");
            }
        } else {
            debug!(
                %project_id,
                current = %history.status(),
                reported = %report.status,
                "dropping stale deployment status report"
            );
        }
        Ok(history)
    }

    /// Fetches one page of build logs for a deployment.
    ///
    /// With no explicit deployment id the most recently started record is
    /// used; the pagination cursor is forwarded to the platform verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentServiceError`] when resolution fails or the
    /// platform does not support logs.
    pub async fn logs(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        external_deployment_id: Option<&str>,
        cursor: Option<&str>,
    ) -> DeploymentServiceResult<LogPage> {
        let project = self.owned_project(user_id, project_id).await?;
        let history = self
            .resolve_history(project_id, external_deployment_id)
            .await?;

        let credential = self
            .credentials
            .require(user_id, project.platform())
            .await?
            .provider_credentials();
        let provider = self.provider(project.platform())?;
        Ok(provider
            .deployment_logs(
                &credential,
                project.external_project_id(),
                history.external_deployment_id(),
                cursor,
            )
            .await?)
    }

    /// Returns the recorded deployment history for a project, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DeploymentServiceError`] when ownership verification or the
    /// lookup fails.
    pub async fn history(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> DeploymentServiceResult<Vec<DeploymentHistory>> {
        self.owned_project(user_id, project_id).await?;
        Ok(self.histories.list_for_project(project_id).await?)
    }

    async fn resolve_history(
        &self,
        project_id: ProjectId,
        external_deployment_id: Option<&str>,
    ) -> DeploymentServiceResult<DeploymentHistory> {
        let record = match external_deployment_id {
            Some(external_id) => {
                self.histories
                    .find_by_external_id(project_id, external_id)
                    .await?
            }
            None => self.histories.find_latest_for_project(project_id).await?,
        };
        record.ok_or(DeploymentServiceError::NoDeployments(project_id))
    }

    fn provider(&self, platform: Platform) -> DeploymentServiceResult<Arc<dyn HostingProvider>> {
        self.providers
            .get(platform)
            .ok_or(DeploymentServiceError::UnknownPlatform(platform))
    }

    async fn owned_project(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> DeploymentServiceResult<DeploymentProject> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(DeploymentServiceError::ProjectNotFound(project_id))?;
        let repository = self
            .directory
            .find(project.repository_id())
            .await?
            .ok_or(DeploymentServiceError::NotOwner)?;
        if !repository.is_owned_by(user_id) {
            return Err(DeploymentServiceError::NotOwner);
        }
        Ok(project)
    }
}

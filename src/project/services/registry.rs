//! Service layer for deployment project registration and domain management.

use crate::credential::domain::UserId;
use crate::credential::services::{CredentialService, CredentialServiceError};
use crate::deployment::ports::DeploymentHistoryRepository;
use crate::hosting::domain::{
    DeployOutcome, DnsRecord, DomainAttachment, Platform, ProjectConfig,
};
use crate::hosting::error::ProviderError;
use crate::hosting::ports::HostingProvider;
use crate::hosting::registry::ProviderRegistry;
use crate::project::domain::{
    DeploymentProject, ProjectDomainError, ProjectId, RepositoryId, SourceRepository,
};
use crate::project::ports::{ProjectRepository, ProjectRepositoryError, RepositoryDirectory};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Request payload for registering a deployment project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    repository_id: RepositoryId,
    platform: Platform,
    name: Option<String>,
    auto_deploy: bool,
}

impl CreateProjectRequest {
    /// Creates a request targeting a repository and platform.
    ///
    /// The project name defaults to the repository name; the first deploy is
    /// kicked off automatically unless disabled.
    #[must_use]
    pub const fn new(repository_id: RepositoryId, platform: Platform) -> Self {
        Self {
            repository_id,
            platform,
            name: None,
            auto_deploy: true,
        }
    }

    /// Overrides the project name on the platform.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Disables the automatic first deployment.
    #[must_use]
    pub const fn without_auto_deploy(mut self) -> Self {
        self.auto_deploy = false;
        self
    }
}

/// Service-level errors for project registry operations.
#[derive(Debug, Error)]
pub enum ProjectRegistryError {
    /// The backing repository does not exist.
    #[error("repository not found: {0}")]
    RepositoryNotFound(RepositoryId),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The requesting user does not own the backing repository.
    #[error("not authorized to manage this project")]
    NotOwner,

    /// The platform has no adapter bound in the registry.
    #[error("unsupported platform: {0}")]
    UnknownPlatform(Platform),

    /// Domain invariant violation.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// Provider adapter failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Project persistence failure.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),

    /// Credential store failure, including missing platform connection.
    #[error(transparent)]
    Credential(#[from] CredentialServiceError),
}

/// Result type for project registry operations.
pub type ProjectRegistryResult<T> = Result<T, ProjectRegistryError>;

/// Outcome of registering a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredProject {
    /// The persisted project record.
    pub project: DeploymentProject,
    /// The first deployment, when auto-deploy started one.
    pub first_deployment: Option<DeployOutcome>,
}

/// Deployment project registry.
///
/// Every mutating operation re-verifies that the requesting user owns the
/// repository backing the project; identifiers arriving from the client are
/// never trusted on their own. For domain changes the provider call must
/// succeed before local state is touched: the platform is the source of
/// truth and the local list is a cache.
#[derive(Clone)]
pub struct ProjectRegistryService {
    projects: Arc<dyn ProjectRepository>,
    directory: Arc<dyn RepositoryDirectory>,
    histories: Arc<dyn DeploymentHistoryRepository>,
    credentials: CredentialService,
    providers: ProviderRegistry,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl ProjectRegistryService {
    /// Creates a new project registry service.
    #[must_use]
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        directory: Arc<dyn RepositoryDirectory>,
        histories: Arc<dyn DeploymentHistoryRepository>,
        credentials: CredentialService,
        providers: ProviderRegistry,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            projects,
            directory,
            histories,
            credentials,
            providers,
            clock,
        }
    }

    /// Registers a project for a repository on a platform.
    ///
    /// Requires a stored credential for the platform. Re-running setup for
    /// the same `(repository, platform)` pair refreshes the existing record
    /// instead of duplicating it.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError`] when ownership, connection or the
    /// provider call fails.
    pub async fn create(
        &self,
        user_id: UserId,
        request: CreateProjectRequest,
    ) -> ProjectRegistryResult<RegisteredProject> {
        let repository = self.owned_repository(user_id, request.repository_id).await?;
        let credential = self
            .credentials
            .require(user_id, request.platform)
            .await?
            .provider_credentials();
        let provider = self.provider(request.platform)?;

        let name = request
            .name
            .unwrap_or_else(|| repository.name.clone());
        let config = ProjectConfig::new(name, &repository.owner, &repository.name);

        let (snapshot, first_deployment) = if request.auto_deploy {
            let setup = provider.auto_setup(&credential, &config).await?;
            (setup.project, setup.deployment)
        } else {
            (provider.create_project(&credential, &config).await?, None)
        };

        let project = match self
            .projects
            .find_by_repository(request.repository_id, request.platform)
            .await?
        {
            Some(mut existing) => {
                existing.refresh_from_snapshot(snapshot, &*self.clock);
                existing
            }
            None => DeploymentProject::from_snapshot(
                request.repository_id,
                request.platform,
                snapshot,
                &*self.clock,
            ),
        };
        self.projects.upsert(&project).await?;

        Ok(RegisteredProject {
            project,
            first_deployment,
        })
    }

    /// Returns a project after verifying ownership.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError::ProjectNotFound`] for unknown ids and
    /// [`ProjectRegistryError::NotOwner`] for foreign projects.
    pub async fn get(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> ProjectRegistryResult<DeploymentProject> {
        self.owned_project(user_id, project_id).await
    }

    /// Lists all projects backed by the user's repositories.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError::Repository`] when a lookup fails.
    pub async fn list(&self, user_id: UserId) -> ProjectRegistryResult<Vec<DeploymentProject>> {
        let repositories = self.directory.list_for_user(user_id).await?;
        let ids: Vec<RepositoryId> = repositories.iter().map(|repository| repository.id).collect();
        Ok(self.projects.list_for_repositories(&ids).await?)
    }

    /// Deletes a project.
    ///
    /// The provider-side deletion is best-effort: an unreachable platform
    /// must not leave local bookkeeping stuck, so upstream failures are
    /// logged and the local record is removed regardless.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError`] when ownership verification or the
    /// local deletion fails.
    pub async fn delete(&self, user_id: UserId, project_id: ProjectId) -> ProjectRegistryResult<()> {
        let project = self.owned_project(user_id, project_id).await?;

        match self.credentials.get(user_id, project.platform()).await {
            Ok(Some(credential)) => {
                let provider = self.provider(project.platform())?;
                if let Err(err) = provider
                    .delete_project(
                        &credential.provider_credentials(),
                        project.external_project_id(),
                    )
                    .await
                {
                    warn!(%project_id, error = %err, "provider-side project deletion failed");
                }
            }
            Ok(None) => {
                debug!(%project_id, "skipping provider deletion: platform not connected");
            }
            Err(err) => {
                warn!(%project_id, error = %err, "could not load credential for provider deletion");
            }
        }

        if let Err(err) = self.histories.delete_for_project(project_id).await {
            warn!(%project_id, error = %err, "failed to cascade deployment history deletion");
        }
        self.projects.delete(project_id).await?;
        Ok(())
    }

    /// Attaches a custom domain to a project.
    ///
    /// The domain cap and duplicate checks run before the provider call;
    /// the local list is only extended once the provider accepted the
    /// domain.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError::Domain`] on cap or duplicate
    /// violations, or the provider error when the platform rejects the
    /// domain.
    pub async fn add_domain(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        domain: &str,
    ) -> ProjectRegistryResult<DomainAttachment> {
        let mut project = self.owned_project(user_id, project_id).await?;
        project.check_domain_addable(domain)?;

        let credential = self
            .credentials
            .require(user_id, project.platform())
            .await?
            .provider_credentials();
        let provider = self.provider(project.platform())?;
        let attachment = provider
            .attach_domain(&credential, project.external_project_id(), domain)
            .await?;

        project.add_domain(domain, &*self.clock)?;
        self.projects.update(&project).await?;
        Ok(attachment)
    }

    /// Removes a custom domain from a project.
    ///
    /// The provider removal must succeed before the local list is pruned.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError::Domain`] when the domain is not
    /// attached, or the provider error when the platform rejects the
    /// removal.
    pub async fn remove_domain(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        domain: &str,
    ) -> ProjectRegistryResult<()> {
        let mut project = self.owned_project(user_id, project_id).await?;
        if !project
            .custom_domains()
            .iter()
            .any(|existing| existing == domain)
        {
            return Err(ProjectDomainError::UnknownDomain(domain.to_owned()).into());
        }

        let credential = self
            .credentials
            .require(user_id, project.platform())
            .await?
            .provider_credentials();
        let provider = self.provider(project.platform())?;
        let removed = provider
            .detach_domain(&credential, project.external_project_id(), domain)
            .await?;
        if !removed {
            debug!(%project_id, domain, "provider reported domain was not attached");
        }

        project.remove_domain(domain, &*self.clock)?;
        self.projects.update(&project).await?;
        Ok(())
    }

    /// Returns the DNS records required for a domain on a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRegistryError`] when ownership, connection or the
    /// provider call fails.
    pub async fn dns_instructions(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        domain: &str,
    ) -> ProjectRegistryResult<Vec<DnsRecord>> {
        let project = self.owned_project(user_id, project_id).await?;
        let credential = self
            .credentials
            .require(user_id, project.platform())
            .await?
            .provider_credentials();
        let provider = self.provider(project.platform())?;
        Ok(provider
            .dns_instructions(&credential, project.external_project_id(), domain)
            .await?)
    }

    fn provider(&self, platform: Platform) -> ProjectRegistryResult<Arc<dyn HostingProvider>> {
        self.providers
            .get(platform)
            .ok_or(ProjectRegistryError::UnknownPlatform(platform))
    }

    async fn owned_repository(
        &self,
        user_id: UserId,
        repository_id: RepositoryId,
    ) -> ProjectRegistryResult<SourceRepository> {
        let repository = self
            .directory
            .find(repository_id)
            .await?
            .ok_or(ProjectRegistryError::RepositoryNotFound(repository_id))?;
        if !repository.is_owned_by(user_id) {
            return Err(ProjectRegistryError::NotOwner);
        }
        Ok(repository)
    }

    async fn owned_project(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> ProjectRegistryResult<DeploymentProject> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(ProjectRegistryError::ProjectNotFound(project_id))?;
        self.owned_repository(user_id, project.repository_id())
            .await
            .map_err(|err| match err {
                ProjectRegistryError::RepositoryNotFound(_) => ProjectRegistryError::NotOwner,
                other => other,
            })?;
        Ok(project)
    }
}

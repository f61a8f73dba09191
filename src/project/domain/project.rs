//! Deployment project aggregate root.

use super::{ProjectDomainError, ProjectId, RepositoryId};
use crate::hosting::domain::{Platform, ProjectSnapshot};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A deployable unit on one platform, backed by one source repository.
///
/// At most one active project exists per `(repository, platform)` pair;
/// re-running setup updates the existing record through the repository
/// upsert. The custom domain list mirrors the platform and is ordered and
/// duplicate-free; the platform's domain cap is enforced before any provider
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentProject {
    id: ProjectId,
    repository_id: RepositoryId,
    platform: Platform,
    external_project_id: String,
    project_name: String,
    production_url: Option<String>,
    custom_domains: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted backing repository.
    pub repository_id: RepositoryId,
    /// Persisted platform.
    pub platform: Platform,
    /// Persisted platform-assigned project identifier.
    pub external_project_id: String,
    /// Persisted project name.
    pub project_name: String,
    /// Persisted production URL, if known.
    pub production_url: Option<String>,
    /// Persisted custom domain list.
    pub custom_domains: Vec<String>,
    /// Persisted activation state.
    pub is_active: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl DeploymentProject {
    /// Creates a project from the platform's creation snapshot.
    #[must_use]
    pub fn from_snapshot(
        repository_id: RepositoryId,
        platform: Platform,
        snapshot: ProjectSnapshot,
        clock: &dyn Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            repository_id,
            platform,
            external_project_id: snapshot.external_id,
            project_name: snapshot.name,
            production_url: snapshot.production_url,
            custom_domains: snapshot.custom_domains,
            is_active: true,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            repository_id: data.repository_id,
            platform: data.platform,
            external_project_id: data.external_project_id,
            project_name: data.project_name,
            production_url: data.production_url,
            custom_domains: data.custom_domains,
            is_active: data.is_active,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the backing repository identifier.
    #[must_use]
    pub const fn repository_id(&self) -> RepositoryId {
        self.repository_id
    }

    /// Returns the hosting platform.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the platform-assigned project identifier.
    #[must_use]
    pub fn external_project_id(&self) -> &str {
        &self.external_project_id
    }

    /// Returns the project name on the platform.
    #[must_use]
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Returns the production URL, when the platform has assigned one.
    #[must_use]
    pub fn production_url(&self) -> Option<&str> {
        self.production_url.as_deref()
    }

    /// Returns the ordered custom domain list.
    #[must_use]
    pub fn custom_domains(&self) -> &[String] {
        &self.custom_domains
    }

    /// Returns whether the project is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Checks that another domain may be attached.
    ///
    /// Run before the provider call so the cap is never exceeded upstream
    /// either.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError`] when domains are unsupported, the cap
    /// is reached, or the domain is already attached.
    pub fn check_domain_addable(&self, domain: &str) -> Result<(), ProjectDomainError> {
        let capabilities = self.platform.capabilities();
        if !capabilities.supports_custom_domains() {
            return Err(ProjectDomainError::CustomDomainsUnsupported(self.platform));
        }
        if self.custom_domains.len() >= capabilities.max_custom_domains() {
            return Err(ProjectDomainError::DomainLimitReached {
                platform: self.platform,
                limit: capabilities.max_custom_domains(),
            });
        }
        if self.custom_domains.iter().any(|existing| existing == domain) {
            return Err(ProjectDomainError::DuplicateDomain(domain.to_owned()));
        }
        Ok(())
    }

    /// Appends a domain after the provider accepted it.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError`] when the addition would violate the
    /// cap or uniqueness invariants.
    pub fn add_domain(
        &mut self,
        domain: impl Into<String>,
        clock: &dyn Clock,
    ) -> Result<(), ProjectDomainError> {
        let domain = domain.into();
        self.check_domain_addable(&domain)?;
        self.custom_domains.push(domain);
        self.touch(clock);
        Ok(())
    }

    /// Removes a domain after the provider released it.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::UnknownDomain`] when the domain is not
    /// attached.
    pub fn remove_domain(
        &mut self,
        domain: &str,
        clock: &dyn Clock,
    ) -> Result<(), ProjectDomainError> {
        let before = self.custom_domains.len();
        self.custom_domains.retain(|existing| existing != domain);
        if self.custom_domains.len() == before {
            return Err(ProjectDomainError::UnknownDomain(domain.to_owned()));
        }
        self.touch(clock);
        Ok(())
    }

    /// Refreshes platform-reported fields on re-setup.
    pub fn refresh_from_snapshot(&mut self, snapshot: ProjectSnapshot, clock: &dyn Clock) {
        self.external_project_id = snapshot.external_id;
        self.project_name = snapshot.name;
        self.production_url = snapshot.production_url;
        self.custom_domains = snapshot.custom_domains;
        self.is_active = true;
        self.touch(clock);
    }

    /// Marks the project inactive after the platform reported its removal.
    pub fn deactivate(&mut self, clock: &dyn Clock) {
        self.is_active = false;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &dyn Clock) {
        self.updated_at = clock.utc();
    }
}

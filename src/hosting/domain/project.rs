//! Project-level value objects exchanged with provider adapters.

use serde::{Deserialize, Serialize};

/// Configuration for creating a deployable project on a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    name: String,
    repo_owner: String,
    repo_name: String,
    production_branch: String,
}

impl ProjectConfig {
    /// Creates a project configuration for a source repository.
    ///
    /// The production branch defaults to `main`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            production_branch: "main".to_owned(),
        }
    }

    /// Overrides the production branch.
    #[must_use]
    pub fn with_production_branch(mut self, branch: impl Into<String>) -> Self {
        self.production_branch = branch.into();
        self
    }

    /// Returns the project name on the platform.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the source repository owner.
    #[must_use]
    pub fn repo_owner(&self) -> &str {
        &self.repo_owner
    }

    /// Returns the source repository name.
    #[must_use]
    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    /// Returns the branch deployed to production.
    #[must_use]
    pub fn production_branch(&self) -> &str {
        &self.production_branch
    }

    /// Returns the `owner/repo` form used by platforms that link projects to
    /// a repository.
    #[must_use]
    pub fn repo_slug(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }
}

/// Snapshot of a platform project as the provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    /// Platform-assigned project identifier.
    pub external_id: String,
    /// Project name on the platform.
    pub name: String,
    /// Production URL, when the platform has assigned one.
    pub production_url: Option<String>,
    /// Custom domains attached on the platform side.
    pub custom_domains: Vec<String>,
}

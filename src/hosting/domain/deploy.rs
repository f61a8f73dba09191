//! Deployment value objects exchanged with provider adapters.

use crate::deployment::domain::DeploymentStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parameters for triggering one deployment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    branch: String,
    commit_sha: Option<String>,
    production: bool,
}

impl DeployRequest {
    /// Creates a production deploy request for a branch.
    #[must_use]
    pub fn production(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            commit_sha: None,
            production: true,
        }
    }

    /// Creates a preview deploy request for a branch.
    #[must_use]
    pub fn preview(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            commit_sha: None,
            production: false,
        }
    }

    /// Pins the deploy to a specific commit.
    #[must_use]
    pub fn with_commit_sha(mut self, sha: impl Into<String>) -> Self {
        self.commit_sha = Some(sha.into());
        self
    }

    /// Returns the branch to deploy.
    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Returns the pinned commit, if any.
    #[must_use]
    pub fn commit_sha(&self) -> Option<&str> {
        self.commit_sha.as_deref()
    }

    /// Returns whether this targets production.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        self.production
    }
}

/// The platform's immediate answer to a deploy trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployOutcome {
    /// Platform-assigned deployment identifier.
    pub external_deployment_id: String,
    /// URL the deployment will be served from, when already known.
    pub deployment_url: Option<String>,
    /// Preview URL for non-production deploys, when already known.
    pub preview_url: Option<String>,
}

/// Project creation plus first deploy, for zero-config onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSetup {
    /// The created project.
    pub project: super::ProjectSnapshot,
    /// The first deployment kicked off during setup, when the platform
    /// starts one.
    pub deployment: Option<DeployOutcome>,
}

/// Point-in-time deployment status as polled from the platform.
///
/// Optional fields carry partial-update semantics: a field the platform did
/// not return must not overwrite locally recorded history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Normalized deployment status.
    pub status: DeploymentStatus,
    /// Deployment URL, when reported.
    pub deployment_url: Option<String>,
    /// Preview URL, when reported.
    pub preview_url: Option<String>,
    /// Platform-side creation time, when reported.
    pub created_at: Option<DateTime<Utc>>,
    /// Platform-side completion time, when reported.
    pub completed_at: Option<DateTime<Utc>>,
    /// Platform-supplied failure message, when reported.
    pub error: Option<String>,
}

/// One page of build log entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPage {
    /// Log lines in delivery order.
    pub entries: Vec<LogEntry>,
    /// Whether more pages follow.
    pub has_more: bool,
    /// Opaque cursor for the next page, forwarded verbatim to the platform.
    pub next_cursor: Option<String>,
}

/// A single build log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Entry timestamp, when the platform provides one.
    pub timestamp: Option<DateTime<Utc>>,
    /// Severity label as the platform reports it.
    pub level: Option<String>,
    /// Log message text.
    pub message: String,
}

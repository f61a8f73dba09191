//! Deployment history aggregate root.

use super::{DeploymentId, DeploymentStatus};
use crate::hosting::domain::StatusReport;
use crate::project::domain::ProjectId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What initiated a deployment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    /// Recorded while handling an API deploy request.
    Api,
    /// Recorded from a platform webhook.
    Webhook,
}

impl TriggerSource {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Webhook => "webhook",
        }
    }
}

impl TryFrom<&str> for TriggerSource {
    type Error = ParseTriggerSourceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(Self::Api),
            "webhook" => Ok(Self::Webhook),
            _ => Err(ParseTriggerSourceError(value.to_owned())),
        }
    }
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing trigger sources from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown trigger source: {0}")]
pub struct ParseTriggerSourceError(pub String);

/// One deployment attempt and its lifecycle so far.
///
/// Rows are appended per attempt and then updated in place as status
/// reports arrive from polling or webhooks. Reports are partial: only
/// fields the platform actually returned overwrite local state, and a
/// report whose status would regress a terminal outcome is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentHistory {
    id: DeploymentId,
    project_id: ProjectId,
    external_deployment_id: String,
    status: DeploymentStatus,
    deployment_url: Option<String>,
    preview_url: Option<String>,
    commit_sha: Option<String>,
    commit_message: Option<String>,
    triggered_by: TriggerSource,
    error_message: Option<String>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted history record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryData {
    /// Persisted record identifier.
    pub id: DeploymentId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted platform-assigned deployment identifier.
    pub external_deployment_id: String,
    /// Persisted status.
    pub status: DeploymentStatus,
    /// Persisted deployment URL, if any.
    pub deployment_url: Option<String>,
    /// Persisted preview URL, if any.
    pub preview_url: Option<String>,
    /// Persisted commit SHA, if any.
    pub commit_sha: Option<String>,
    /// Persisted commit message, if any.
    pub commit_message: Option<String>,
    /// Persisted trigger source.
    pub triggered_by: TriggerSource,
    /// Persisted failure message, if any.
    pub error_message: Option<String>,
    /// Persisted start timestamp.
    pub started_at: DateTime<Utc>,
    /// Persisted completion timestamp, if any.
    pub completed_at: Option<DateTime<Utc>>,
}

impl DeploymentHistory {
    /// Records a freshly triggered deployment in `Pending` state.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        external_deployment_id: impl Into<String>,
        triggered_by: TriggerSource,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            id: DeploymentId::new(),
            project_id,
            external_deployment_id: external_deployment_id.into(),
            status: DeploymentStatus::Pending,
            deployment_url: None,
            preview_url: None,
            commit_sha: None,
            commit_message: None,
            triggered_by,
            error_message: None,
            started_at: clock.utc(),
            completed_at: None,
        }
    }

    /// Reconstructs a history record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            external_deployment_id: data.external_deployment_id,
            status: data.status,
            deployment_url: data.deployment_url,
            preview_url: data.preview_url,
            commit_sha: data.commit_sha,
            commit_message: data.commit_message,
            triggered_by: data.triggered_by,
            error_message: data.error_message,
            started_at: data.started_at,
            completed_at: data.completed_at,
        }
    }

    /// Sets the deployment URL at creation time.
    #[must_use]
    pub fn with_deployment_url(mut self, url: impl Into<String>) -> Self {
        self.deployment_url = Some(url.into());
        self
    }

    /// Sets the preview URL at creation time.
    #[must_use]
    pub fn with_preview_url(mut self, url: impl Into<String>) -> Self {
        self.preview_url = Some(url.into());
        self
    }

    /// Sets the commit SHA at creation time.
    #[must_use]
    pub fn with_commit_sha(mut self, sha: impl Into<String>) -> Self {
        self.commit_sha = Some(sha.into());
        self
    }

    /// Sets the commit message at creation time.
    #[must_use]
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = Some(message.into());
        self
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> DeploymentId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the platform-assigned deployment identifier.
    #[must_use]
    pub fn external_deployment_id(&self) -> &str {
        &self.external_deployment_id
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> DeploymentStatus {
        self.status
    }

    /// Returns the deployment URL, if known.
    #[must_use]
    pub fn deployment_url(&self) -> Option<&str> {
        self.deployment_url.as_deref()
    }

    /// Returns the preview URL, if known.
    #[must_use]
    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    /// Returns the commit SHA, if known.
    #[must_use]
    pub fn commit_sha(&self) -> Option<&str> {
        self.commit_sha.as_deref()
    }

    /// Returns the commit message, if known.
    #[must_use]
    pub fn commit_message(&self) -> Option<&str> {
        self.commit_message.as_deref()
    }

    /// Returns what initiated this record.
    #[must_use]
    pub const fn triggered_by(&self) -> TriggerSource {
        self.triggered_by
    }

    /// Returns the platform-supplied failure message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the completion timestamp, if the attempt has finished.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Applies a status report from polling or a webhook.
    ///
    /// Returns `false` and changes nothing when the reported status would
    /// move out of a terminal state: platform delivery is unordered and a
    /// stale `building` must not reopen a finished deployment. Re-reporting
    /// the current status is applied idempotently so late-arriving URLs and
    /// error text can still fill in.
    pub fn apply_report(&mut self, report: &StatusReport, clock: &dyn Clock) -> bool {
        if !self.status.can_transition_to(report.status) {
            return false;
        }
        self.status = report.status;

        if let Some(url) = &report.deployment_url {
            self.deployment_url = Some(url.clone());
        }
        if let Some(url) = &report.preview_url {
            self.preview_url = Some(url.clone());
        }
        if let Some(error) = &report.error {
            self.error_message = Some(error.clone());
        }
        if let Some(completed) = report.completed_at {
            self.completed_at = Some(completed);
        } else if self.status.is_terminal() && self.completed_at.is_none() {
            self.completed_at = Some(clock.utc());
        }
        true
    }
}

//! Asynchronous intake of platform-pushed deployment events.

use crate::config::PlatformSettings;
use crate::deployment::domain::{DeploymentHistory, TriggerSource};
use crate::deployment::ports::{DeploymentHistoryError, DeploymentHistoryRepository};
use crate::hosting::domain::{Platform, StatusReport};
use crate::project::ports::ProjectRepository;
use crate::webhook::domain::{WebhookEvent, parse_event};
use crate::webhook::signature::{SignatureError, verify_signature};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

/// What the ingestor did with a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The event updated local records.
    Applied,
    /// The event was authentic but changed nothing: an untracked event
    /// type, an unknown external id, a replay, or an internal failure that
    /// was logged instead of surfaced.
    Ignored,
}

/// Errors that reject a delivery before acknowledgement.
///
/// Everything past authentication is acknowledged to the sender regardless
/// of processing outcome, so retries cannot mask a permanent local bug.
#[derive(Debug, Error)]
pub enum IngestError {
    /// No signing secret is configured for the platform.
    #[error("no webhook secret configured for {0}")]
    NoSecret(Platform),

    /// The delivery failed signature verification.
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// Result type for webhook ingestion.
pub type IngestResult<T> = Result<T, IngestError>;

/// Webhook ingestor.
///
/// Runs apart from the request/response orchestration path: delivery is
/// push-based and unordered, so every update goes through the same guarded
/// status transition as polling, and replays are idempotent.
#[derive(Clone)]
pub struct WebhookIngestor {
    settings: PlatformSettings,
    projects: Arc<dyn ProjectRepository>,
    histories: Arc<dyn DeploymentHistoryRepository>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl WebhookIngestor {
    /// Creates a new ingestor.
    #[must_use]
    pub fn new(
        settings: PlatformSettings,
        projects: Arc<dyn ProjectRepository>,
        histories: Arc<dyn DeploymentHistoryRepository>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            settings,
            projects,
            histories,
            clock,
        }
    }

    /// Authenticates and processes one webhook delivery.
    ///
    /// The raw body is verified before parsing; an invalid or missing
    /// signature rejects the delivery with no state mutation. After
    /// authentication, internal failures are logged and reported as
    /// [`IngestOutcome::Ignored`], never as errors.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] only for authentication failures.
    pub async fn ingest(
        &self,
        platform: Platform,
        signature: Option<&str>,
        body: &[u8],
    ) -> IngestResult<IngestOutcome> {
        let secret = self
            .settings
            .webhook_secret(platform)
            .ok_or(IngestError::NoSecret(platform))?;
        verify_signature(platform, secret, body, signature)?;

        let payload: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(err) => {
                warn!(%platform, error = %err, "discarding authentic webhook with unparseable body");
                return Ok(IngestOutcome::Ignored);
            }
        };

        let Some(event) = parse_event(platform, &payload) else {
            debug!(%platform, "webhook event type is not tracked");
            return Ok(IngestOutcome::Ignored);
        };

        Ok(self.apply(platform, event).await)
    }

    async fn apply(&self, platform: Platform, event: WebhookEvent) -> IngestOutcome {
        match event {
            WebhookEvent::DeploymentCreated {
                external_project_id,
                external_deployment_id,
                deployment_url,
                commit_sha,
                commit_message,
            } => {
                self.record_created(
                    platform,
                    &external_project_id,
                    &external_deployment_id,
                    deployment_url,
                    commit_sha,
                    commit_message,
                )
                .await
            }
            WebhookEvent::DeploymentStatusChanged {
                external_project_id,
                external_deployment_id,
                status,
                deployment_url,
                error,
            } => {
                let report = StatusReport {
                    status,
                    deployment_url,
                    preview_url: None,
                    created_at: None,
                    completed_at: None,
                    error,
                };
                self.record_status(
                    platform,
                    &external_project_id,
                    &external_deployment_id,
                    &report,
                )
                .await
            }
            WebhookEvent::ProjectRemoved {
                external_project_id,
            } => self.record_removed(platform, &external_project_id).await,
        }
    }

    async fn record_created(
        &self,
        platform: Platform,
        external_project_id: &str,
        external_deployment_id: &str,
        deployment_url: Option<String>,
        commit_sha: Option<String>,
        commit_message: Option<String>,
    ) -> IngestOutcome {
        let Some(project) = self.lookup_project(platform, external_project_id).await else {
            return IngestOutcome::Ignored;
        };

        match self
            .histories
            .find_by_external_id(project.id(), external_deployment_id)
            .await
        {
            Ok(Some(_)) => {
                debug!(%platform, external_deployment_id, "deployment already recorded");
                return IngestOutcome::Applied;
            }
            Ok(None) => {}
            Err(err) => {
                error!(%platform, error = %err, "history lookup failed during webhook processing");
                return IngestOutcome::Ignored;
            }
        }

        let mut history = DeploymentHistory::new(
            project.id(),
            external_deployment_id,
            TriggerSource::Webhook,
            &*self.clock,
        );
        if let Some(url) = deployment_url {
            history = history.with_deployment_url(url);
        }
        if let Some(sha) = commit_sha {
            history = history.with_commit_sha(sha);
        }
        if let Some(message) = commit_message {
            history = history.with_commit_message(message);
        }

        match self.histories.insert(&history).await {
            Ok(()) => IngestOutcome::Applied,
            // A concurrent delivery won the insert; replays converge on the
            // same final state either way.
            Err(DeploymentHistoryError::DuplicateDeployment { .. }) => IngestOutcome::Applied,
            Err(err) => {
                error!(%platform, error = %err, "failed to record webhook deployment");
                IngestOutcome::Ignored
            }
        }
    }

    async fn record_status(
        &self,
        platform: Platform,
        external_project_id: &str,
        external_deployment_id: &str,
        report: &StatusReport,
    ) -> IngestOutcome {
        let Some(project) = self.lookup_project(platform, external_project_id).await else {
            return IngestOutcome::Ignored;
        };

        let history = match self
            .histories
            .find_by_external_id(project.id(), external_deployment_id)
            .await
        {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(
                    %platform,
                    external_deployment_id,
                    "ignoring status for unknown deployment"
                );
                return IngestOutcome::Ignored;
            }
            Err(err) => {
                error!(%platform, error = %err, "history lookup failed during webhook processing");
                return IngestOutcome::Ignored;
            }
        };

        let mut updated = history;
        if !updated.apply_report(report, &*self.clock) {
            debug!(
                %platform,
                external_deployment_id,
                reported = %report.status,
                "dropping stale webhook status"
            );
            return IngestOutcome::Ignored;
        }

        match self.histories.update(&updated).await {
            Ok(()) => IngestOutcome::Applied,
            Err(err) => {
                error!(%platform, error = %err, "failed to persist webhook status update");
                IngestOutcome::Ignored
            }
        }
    }

    async fn record_removed(
        &self,
        platform: Platform,
        external_project_id: &str,
    ) -> IngestOutcome {
        let Some(mut project) = self.lookup_project(platform, external_project_id).await else {
            return IngestOutcome::Ignored;
        };

        project.deactivate(&*self.clock);
        match self.projects.update(&project).await {
            Ok(()) => IngestOutcome::Applied,
            Err(err) => {
                error!(%platform, error = %err, "failed to deactivate removed project");
                IngestOutcome::Ignored
            }
        }
    }

    async fn lookup_project(
        &self,
        platform: Platform,
        external_project_id: &str,
    ) -> Option<crate::project::domain::DeploymentProject> {
        match self
            .projects
            .find_by_external_id(platform, external_project_id)
            .await
        {
            Ok(Some(project)) => Some(project),
            Ok(None) => {
                // Expected when webhooks are configured platform-wide but
                // only a subset of projects is registered locally.
                debug!(%platform, external_project_id, "webhook references unknown project");
                None
            }
            Err(err) => {
                error!(%platform, error = %err, "project lookup failed during webhook processing");
                None
            }
        }
    }
}

//! Normalized webhook events and per-platform payload parsing.

use crate::deployment::domain::DeploymentStatus;
use crate::hosting::domain::Platform;
use serde_json::Value;

/// A platform-pushed lifecycle event, normalized across payload shapes.
///
/// Events reference platform-side identifiers only; matching them to local
/// records is the ingestor's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// A deployment attempt was started on the platform.
    DeploymentCreated {
        /// Platform-assigned project identifier.
        external_project_id: String,
        /// Platform-assigned deployment identifier.
        external_deployment_id: String,
        /// Deployment URL, when the payload carries one.
        deployment_url: Option<String>,
        /// Commit SHA, when the payload carries one.
        commit_sha: Option<String>,
        /// Commit message, when the payload carries one.
        commit_message: Option<String>,
    },

    /// A deployment attempt changed status.
    DeploymentStatusChanged {
        /// Platform-assigned project identifier.
        external_project_id: String,
        /// Platform-assigned deployment identifier.
        external_deployment_id: String,
        /// Reported status.
        status: DeploymentStatus,
        /// Deployment URL, when the payload carries one.
        deployment_url: Option<String>,
        /// Failure message, when the payload carries one.
        error: Option<String>,
    },

    /// The project was removed on the platform side.
    ProjectRemoved {
        /// Platform-assigned project identifier.
        external_project_id: String,
    },
}

/// Parses a platform payload into a normalized event.
///
/// Returns `None` for event types this core does not track; webhooks are
/// commonly configured platform-wide and deliver more than deployment
/// lifecycle events.
#[must_use]
pub fn parse_event(platform: Platform, payload: &Value) -> Option<WebhookEvent> {
    match platform {
        Platform::Vercel => parse_vercel(payload),
        Platform::Netlify => parse_netlify(payload),
        Platform::GithubPages => parse_github_pages(payload),
        Platform::CloudflarePages => parse_cloudflare(payload),
    }
}

fn str_at(payload: &Value, pointer: &str) -> Option<String> {
    payload.pointer(pointer).and_then(Value::as_str).map(str::to_owned)
}

fn parse_vercel(payload: &Value) -> Option<WebhookEvent> {
    let event_type = payload.pointer("/type").and_then(Value::as_str)?;
    let project = str_at(payload, "/payload/project/id");
    let deployment = str_at(payload, "/payload/deployment/id");
    let url = str_at(payload, "/payload/deployment/url").map(|raw| format!("https://{raw}"));

    match event_type {
        "deployment.created" => Some(WebhookEvent::DeploymentCreated {
            external_project_id: project?,
            external_deployment_id: deployment?,
            deployment_url: url,
            commit_sha: str_at(payload, "/payload/deployment/meta/githubCommitSha"),
            commit_message: str_at(payload, "/payload/deployment/meta/githubCommitMessage"),
        }),
        "deployment.succeeded" | "deployment.error" | "deployment.canceled" => {
            let status = match event_type {
                "deployment.succeeded" => DeploymentStatus::Success,
                "deployment.error" => DeploymentStatus::Failed,
                _ => DeploymentStatus::Cancelled,
            };
            Some(WebhookEvent::DeploymentStatusChanged {
                external_project_id: project?,
                external_deployment_id: deployment?,
                status,
                deployment_url: url,
                error: str_at(payload, "/payload/deployment/errorMessage"),
            })
        }
        "project.removed" => Some(WebhookEvent::ProjectRemoved {
            external_project_id: project?,
        }),
        _ => None,
    }
}

fn parse_netlify(payload: &Value) -> Option<WebhookEvent> {
    let site = str_at(payload, "/site_id")?;
    let deploy = str_at(payload, "/id")?;
    let state = payload.pointer("/state").and_then(Value::as_str)?;
    let url = str_at(payload, "/ssl_url");

    match state {
        "new" => Some(WebhookEvent::DeploymentCreated {
            external_project_id: site,
            external_deployment_id: deploy,
            deployment_url: url,
            commit_sha: str_at(payload, "/commit_ref"),
            commit_message: str_at(payload, "/title"),
        }),
        "building" | "ready" | "error" | "canceled" => {
            let status = match state {
                "ready" => DeploymentStatus::Success,
                "error" => DeploymentStatus::Failed,
                "canceled" => DeploymentStatus::Cancelled,
                _ => DeploymentStatus::Building,
            };
            Some(WebhookEvent::DeploymentStatusChanged {
                external_project_id: site,
                external_deployment_id: deploy,
                status,
                deployment_url: url,
                error: str_at(payload, "/error_message"),
            })
        }
        _ => None,
    }
}

fn parse_github_pages(payload: &Value) -> Option<WebhookEvent> {
    let repository = str_at(payload, "/repository/full_name")?;
    let build_status = payload.pointer("/build/status").and_then(Value::as_str)?;
    let build_id = payload
        .pointer("/id")
        .and_then(Value::as_i64)
        .map_or_else(|| "latest".to_owned(), |id| id.to_string());

    match build_status {
        "queued" => Some(WebhookEvent::DeploymentCreated {
            external_project_id: repository,
            external_deployment_id: build_id,
            deployment_url: None,
            commit_sha: str_at(payload, "/build/commit"),
            commit_message: None,
        }),
        "building" | "built" | "errored" => {
            let status = match build_status {
                "built" => DeploymentStatus::Success,
                "errored" => DeploymentStatus::Failed,
                _ => DeploymentStatus::Building,
            };
            Some(WebhookEvent::DeploymentStatusChanged {
                external_project_id: repository,
                external_deployment_id: build_id,
                status,
                deployment_url: None,
                error: str_at(payload, "/build/error/message"),
            })
        }
        _ => None,
    }
}

fn parse_cloudflare(payload: &Value) -> Option<WebhookEvent> {
    let event_type = payload.pointer("/event").and_then(Value::as_str)?;
    let project = str_at(payload, "/project/name");
    let deployment = str_at(payload, "/deployment/id");
    let url = str_at(payload, "/deployment/url");

    match event_type {
        "deployment.created" => Some(WebhookEvent::DeploymentCreated {
            external_project_id: project?,
            external_deployment_id: deployment?,
            deployment_url: url,
            commit_sha: str_at(payload, "/deployment/commit_hash"),
            commit_message: str_at(payload, "/deployment/commit_message"),
        }),
        "deployment.success" | "deployment.failure" | "deployment.canceled" => {
            let status = match event_type {
                "deployment.success" => DeploymentStatus::Success,
                "deployment.failure" => DeploymentStatus::Failed,
                _ => DeploymentStatus::Cancelled,
            };
            Some(WebhookEvent::DeploymentStatusChanged {
                external_project_id: project?,
                external_deployment_id: deployment?,
                status,
                deployment_url: url,
                error: str_at(payload, "/deployment/error"),
            })
        }
        "project.deleted" => Some(WebhookEvent::ProjectRemoved {
            external_project_id: project?,
        }),
        _ => None,
    }
}

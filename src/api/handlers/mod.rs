//! Request handlers for the HTTP surface.

pub(super) mod oauth;
pub(super) mod platforms;
pub(super) mod projects;
pub(super) mod webhooks;

use super::error::ApiError;
use super::state::AppState;
use crate::credential::domain::UserId;
use crate::deployment::domain::DeploymentHistory;
use crate::hosting::domain::Platform;
use crate::project::domain::DeploymentProject;
use axum::http::{HeaderMap, header};
use serde_json::{Value, json};
use std::net::{IpAddr, Ipv4Addr};

/// Resolves the session user from the `Authorization` header.
pub(super) async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<UserId, ApiError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing session token".to_owned()))?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw);
    state
        .authenticator
        .authenticate(token)
        .await
        .ok_or_else(|| ApiError::Unauthorized("invalid session token".to_owned()))
}

/// Parses a platform path segment.
pub(super) fn parse_platform(raw: &str) -> Result<Platform, ApiError> {
    Platform::try_from(raw).map_err(|err| ApiError::Validation(err.to_string()))
}

/// Best-effort client address for rate limiting.
///
/// Reads the first `X-Forwarded-For` hop; direct connections without the
/// header share the loopback bucket.
pub(super) fn client_ip(headers: &HeaderMap) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Applies the operation rate limit for expensive routes.
pub(super) fn check_rate_limit(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    if state.limiter.check(client_ip(headers)) {
        Ok(())
    } else {
        Err(ApiError::RateLimited)
    }
}

/// Wire representation of a project record.
pub(super) fn project_view(project: &DeploymentProject) -> Value {
    json!({
        "id": project.id(),
        "repositoryId": project.repository_id(),
        "platform": project.platform(),
        "externalProjectId": project.external_project_id(),
        "projectName": project.project_name(),
        "productionUrl": project.production_url(),
        "customDomains": project.custom_domains(),
        "isActive": project.is_active(),
        "createdAt": project.created_at(),
        "updatedAt": project.updated_at(),
    })
}

/// Wire representation of a deployment history record.
pub(super) fn history_view(history: &DeploymentHistory) -> Value {
    json!({
        "deploymentId": history.external_deployment_id(),
        "status": history.status(),
        "deploymentUrl": history.deployment_url(),
        "previewUrl": history.preview_url(),
        "commitSha": history.commit_sha(),
        "commitMessage": history.commit_message(),
        "triggeredBy": history.triggered_by(),
        "errorMessage": history.error_message(),
        "startedAt": history.started_at(),
        "completedAt": history.completed_at(),
    })
}

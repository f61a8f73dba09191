//! Project, deployment and domain endpoints.

use super::{authenticate, check_rate_limit, history_view, parse_platform, project_view};
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::deployment::services::TriggerDeployRequest;
use crate::project::domain::{ProjectId, RepositoryId};
use crate::project::services::CreateProjectRequest;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

/// Lists the user's deployment projects.
pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let projects = state.projects.list(user_id).await?;
    let views: Vec<Value> = projects.iter().map(project_view).collect();
    Ok(Json(json!({ "projects": views })))
}

/// Request body for registering a project.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateBody {
    repository_id: Uuid,
    platform: String,
    name: Option<String>,
    auto_deploy: Option<bool>,
}

/// Registers a deployment project for a repository.
pub(crate) async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateBody>,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let platform = parse_platform(&body.platform)?;

    let mut request = CreateProjectRequest::new(RepositoryId::from_uuid(body.repository_id), platform);
    if let Some(name) = body.name {
        request = request.with_name(name);
    }
    if body.auto_deploy == Some(false) {
        request = request.without_auto_deploy();
    }

    let registered = state.projects.create(user_id, request).await?;
    Ok(Json(json!({
        "project": project_view(&registered.project),
        "deploymentUrl": registered
            .first_deployment
            .as_ref()
            .and_then(|deployment| deployment.deployment_url.as_deref()),
    })))
}

/// Returns one project.
pub(crate) async fn get(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let project = state
        .projects
        .get(user_id, ProjectId::from_uuid(project_id))
        .await?;
    Ok(Json(project_view(&project)))
}

/// Deletes a project, best-effort upstream.
pub(crate) async fn delete(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    state
        .projects
        .delete(user_id, ProjectId::from_uuid(project_id))
        .await?;
    Ok(Json(json!({ "deleted": true })))
}

/// Request body for triggering a deployment.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeployBody {
    branch: Option<String>,
    commit_sha: Option<String>,
    commit_message: Option<String>,
    production: Option<bool>,
}

/// Triggers a deployment for a project.
pub(crate) async fn deploy(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    headers: HeaderMap,
    body: Option<Json<DeployBody>>,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    check_rate_limit(&state, &headers)?;
    let Json(body) = body.unwrap_or_default();

    let mut request = if body.production == Some(false) {
        TriggerDeployRequest::preview()
    } else {
        TriggerDeployRequest::production()
    };
    if let Some(branch) = body.branch {
        request = request.with_branch(branch);
    }
    if let Some(sha) = body.commit_sha {
        request = request.with_commit_sha(sha);
    }
    if let Some(message) = body.commit_message {
        request = request.with_commit_message(message);
    }

    let triggered = state
        .deployments
        .trigger(user_id, ProjectId::from_uuid(project_id), request)
        .await?;
    Ok(Json(json!({
        "success": true,
        "deploymentId": triggered.outcome.external_deployment_id,
        "deploymentUrl": triggered.outcome.deployment_url,
        "previewUrl": triggered.outcome.preview_url,
    })))
}

/// Lists a project's custom domains.
pub(crate) async fn list_domains(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let project = state
        .projects
        .get(user_id, ProjectId::from_uuid(project_id))
        .await?;
    Ok(Json(json!({
        "domains": project.custom_domains(),
        "maxCustomDomains": project.platform().capabilities().max_custom_domains(),
    })))
}

/// Request body for attaching a custom domain.
#[derive(Debug, Deserialize)]
pub(crate) struct DomainBody {
    domain: String,
}

/// Attaches a custom domain to a project.
pub(crate) async fn add_domain(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    headers: HeaderMap,
    Json(body): Json<DomainBody>,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    check_rate_limit(&state, &headers)?;
    if body.domain.trim().is_empty() {
        return Err(ApiError::Validation("domain must not be empty".to_owned()));
    }

    let attachment = state
        .projects
        .add_domain(user_id, ProjectId::from_uuid(project_id), &body.domain)
        .await?;
    Ok(Json(json!({
        "domain": body.domain,
        "configured": attachment.configured,
        "verified": attachment.verified,
        "dnsRecords": attachment.dns_records,
    })))
}

/// Query parameters for removing a custom domain.
#[derive(Debug, Deserialize)]
pub(crate) struct DomainQuery {
    domain: String,
}

/// Removes a custom domain from a project.
pub(crate) async fn remove_domain(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<DomainQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    check_rate_limit(&state, &headers)?;
    state
        .projects
        .remove_domain(user_id, ProjectId::from_uuid(project_id), &query.domain)
        .await?;
    Ok(Json(json!({ "domain": query.domain, "removed": true })))
}

/// Query parameters for status and log lookups.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeploymentQuery {
    deployment_id: Option<String>,
    cursor: Option<String>,
}

/// Polls the status of a deployment, defaulting to the latest attempt.
pub(crate) async fn status(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<DeploymentQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let history = state
        .deployments
        .status(
            user_id,
            ProjectId::from_uuid(project_id),
            query.deployment_id.as_deref(),
        )
        .await?;
    Ok(Json(history_view(&history)))
}

/// Fetches build logs for a deployment, defaulting to the latest attempt.
pub(crate) async fn logs(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<DeploymentQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let page = state
        .deployments
        .logs(
            user_id,
            ProjectId::from_uuid(project_id),
            query.deployment_id.as_deref(),
            query.cursor.as_deref(),
        )
        .await?;
    Ok(Json(json!({
        "logs": page.entries,
        "hasMore": page.has_more,
        "nextCursor": page.next_cursor,
    })))
}

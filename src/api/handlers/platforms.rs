//! Platform connection endpoints.

use super::{authenticate, parse_platform};
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::credential::services::ConnectPlatformRequest;
use crate::hosting::domain::ProviderCredentials;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Lists available platforms with connection status and display metadata.
pub(crate) async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let connected = state.credentials.list(user_id).await?;

    let platforms: Vec<Value> = state
        .providers
        .platforms()
        .into_iter()
        .map(|platform| {
            let credential = connected
                .iter()
                .find(|candidate| candidate.platform() == platform);
            let capabilities = platform.capabilities();
            json!({
                "platform": platform,
                "displayName": platform.display_name(),
                "connected": credential.is_some(),
                "teamId": credential.and_then(|c| c.team_id()),
                "accountId": credential.and_then(|c| c.account_id()),
                "capabilities": {
                    "maxCustomDomains": capabilities.max_custom_domains(),
                    "supportsOauth": capabilities.supports_oauth(),
                    "supportsPreviewDeployments": capabilities.supports_preview_deployments(),
                    "supportsDeploymentLogs": capabilities.supports_deployment_logs(),
                },
            })
        })
        .collect();

    Ok(Json(json!({ "platforms": platforms })))
}

/// Request body for manual credential entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConnectBody {
    platform: String,
    access_token: String,
    team_id: Option<String>,
    account_id: Option<String>,
}

/// Stores a manually entered credential after validating it upstream.
pub(crate) async fn connect(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ConnectBody>,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let platform = parse_platform(&body.platform)?;
    if body.access_token.trim().is_empty() {
        return Err(ApiError::Validation("access token must not be empty".to_owned()));
    }

    // The token is validated against the provider before anything is stored.
    let provider = state
        .providers
        .get(platform)
        .ok_or_else(|| ApiError::Validation(format!("unsupported platform: {platform}")))?;
    let mut probe = ProviderCredentials::new(body.access_token.clone());
    if let Some(team) = &body.team_id {
        probe = probe.with_team_id(team.clone());
    }
    if let Some(account) = &body.account_id {
        probe = probe.with_account_id(account.clone());
    }
    provider.verify_credentials(&probe).await?;

    let mut request = ConnectPlatformRequest::new(platform, body.access_token);
    if let Some(team) = body.team_id {
        request = request.with_team_id(team);
    }
    if let Some(account) = body.account_id {
        request = request.with_account_id(account);
    }
    let credential = state.credentials.connect(user_id, request).await?;

    Ok(Json(json!({
        "platform": credential.platform(),
        "connected": true,
        "teamId": credential.team_id(),
        "accountId": credential.account_id(),
        "connectedAt": credential.created_at(),
    })))
}

/// Returns the connection status for one platform.
pub(crate) async fn status(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let platform = parse_platform(&platform)?;
    let credential = state.credentials.get(user_id, platform).await?;

    Ok(Json(json!({
        "platform": platform,
        "connected": credential.is_some(),
        "teamId": credential.as_ref().and_then(|c| c.team_id()),
        "accountId": credential.as_ref().and_then(|c| c.account_id()),
        "connectedAt": credential.as_ref().map(|c| c.created_at()),
    })))
}

/// Disconnects a platform.
///
/// Blocked with a conflict while active projects still use it.
pub(crate) async fn disconnect(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let platform = parse_platform(&platform)?;
    state.credentials.disconnect(user_id, platform).await?;
    Ok(Json(json!({ "platform": platform, "connected": false })))
}

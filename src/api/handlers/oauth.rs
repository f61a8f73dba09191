//! Authorization-flow endpoints.

use super::{authenticate, parse_platform};
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::oauth::services::CallbackParams;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Redirect;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Starts the OAuth flow for a platform.
///
/// Returns the authorization URL for the browser plus the issued state
/// token.
pub(crate) async fn begin(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = authenticate(&state, &headers).await?;
    let platform = parse_platform(&platform)?;

    let redirect = state.connect_flow.begin(user_id, platform).await?;
    Ok(Json(json!({
        "authorizationUrl": redirect.authorization_url,
        "state": redirect.state,
    })))
}

/// Callback query parameters sent back by the platform.
#[derive(Debug, Deserialize)]
pub(crate) struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Completes the OAuth flow at the platform callback.
///
/// Browser-facing: every outcome is a redirect to the settings page, with
/// `success`/`platform` or an `error` query parameter; a raw error page is
/// never rendered.
pub(crate) async fn callback(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Redirect {
    let platform = match parse_platform(&platform) {
        Ok(parsed) => parsed,
        Err(err) => return settings_redirect_error(&state, &err.to_string()),
    };
    let user_id = match authenticate(&state, &headers).await {
        Ok(user_id) => user_id,
        Err(err) => return settings_redirect_error(&state, &err.to_string()),
    };

    let params = CallbackParams {
        code: query.code,
        state: query.state,
        error: query.error,
    };
    match state.connect_flow.complete(user_id, platform, params).await {
        Ok(()) => {
            let url = format!(
                "{}?success=true&platform={}",
                state.settings.settings_url(),
                platform
            );
            Redirect::to(&url)
        }
        Err(err) => settings_redirect_error(&state, &err.to_string()),
    }
}

fn settings_redirect_error(state: &AppState, message: &str) -> Redirect {
    let url = format!(
        "{}?error={}",
        state.settings.settings_url(),
        urlencoding::encode(message)
    );
    Redirect::to(&url)
}

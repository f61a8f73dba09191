//! Inbound webhook endpoint.

use super::parse_platform;
use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::webhook::signature::SignatureSpec;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde_json::{Value, json};
use std::sync::Arc;

/// Receives a platform webhook delivery.
///
/// The signature is checked over the raw body before anything else; a
/// failed check is the only non-200 answer. Once authenticated the delivery
/// is always acknowledged with `{"received": true}` — internal processing
/// failures are logged, not surfaced, so the sender never enters a retry
/// storm against a permanent local bug.
pub(crate) async fn receive(
    State(state): State<Arc<AppState>>,
    Path(platform): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let platform = parse_platform(&platform)?;
    let spec = SignatureSpec::for_platform(platform);
    let signature = headers
        .get(spec.header)
        .and_then(|value| value.to_str().ok());

    state.ingestor.ingest(platform, signature, &body).await?;
    Ok(Json(json!({ "received": true })))
}

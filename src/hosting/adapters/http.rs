//! Shared request/response plumbing for the reqwest-based adapters.

use crate::hosting::domain::Platform;
use crate::hosting::error::{ProviderError, ProviderResult};
use reqwest::RequestBuilder;
use serde_json::Value;

/// Sends a request and decodes a successful JSON response.
///
/// Transport failures become [`ProviderError::Connection`], non-2xx answers
/// become [`ProviderError::Api`] carrying the response body, and undecodable
/// bodies become [`ProviderError::UnexpectedResponse`].
pub(super) async fn expect_json(
    platform: Platform,
    request: RequestBuilder,
) -> ProviderResult<Value> {
    let response = request
        .send()
        .await
        .map_err(|err| ProviderError::connection(platform, err))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::api(platform, format!("HTTP {status}: {body}")));
    }

    response
        .json()
        .await
        .map_err(|err| ProviderError::unexpected(platform, err.to_string()))
}

/// Sends a request and requires a successful status, discarding the body.
pub(super) async fn expect_success(
    platform: Platform,
    request: RequestBuilder,
) -> ProviderResult<()> {
    let response = request
        .send()
        .await
        .map_err(|err| ProviderError::connection(platform, err))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::api(platform, format!("HTTP {status}: {body}")));
    }
    Ok(())
}

/// Sends a deletion-style request, distinguishing "gone" from "was never
/// there".
///
/// Returns `Ok(true)` on success, `Ok(false)` on 404, and an error for any
/// other failure.
pub(super) async fn expect_success_or_missing(
    platform: Platform,
    request: RequestBuilder,
) -> ProviderResult<bool> {
    let response = request
        .send()
        .await
        .map_err(|err| ProviderError::connection(platform, err))?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Ok(false);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::api(platform, format!("HTTP {status}: {body}")));
    }
    Ok(true)
}

/// Extracts a required string at a JSON pointer from a flexibly parsed
/// response.
pub(super) fn require_str(
    platform: Platform,
    value: &Value,
    pointer: &'static str,
) -> ProviderResult<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ProviderError::unexpected(platform, format!("missing field `{pointer}`")))
}

/// Extracts an optional string at a JSON pointer from a flexibly parsed
/// response.
pub(super) fn optional_str(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer).and_then(Value::as_str).map(str::to_owned)
}

/// Parses an RFC 3339 timestamp at a JSON pointer, ignoring malformed
/// values.
pub(super) fn parse_timestamp(
    value: &Value,
    pointer: &str,
) -> Option<chrono::DateTime<chrono::Utc>> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&chrono::Utc))
}

/// Collects the string elements of an optional array field.
pub(super) fn string_array(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

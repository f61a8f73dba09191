//! HTTP error taxonomy and service-error mapping.

use crate::credential::services::CredentialServiceError;
use crate::deployment::services::DeploymentServiceError;
use crate::hosting::error::ProviderError;
use crate::oauth::services::ConnectFlowError;
use crate::project::domain::ProjectDomainError;
use crate::project::services::ProjectRegistryError;
use crate::webhook::services::IngestError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API-level error with a machine-stable code and a human-readable message.
///
/// Every variant maps to one status code; responses are always JSON
/// `{"error": message, "code": code}`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or invalid session.
    #[error("{0}")]
    Unauthorized(String),

    /// Valid session, but the resource belongs to someone else.
    #[error("{0}")]
    Forbidden(String),

    /// Unknown project, repository or platform connection.
    #[error("{0}")]
    NotFound(String),

    /// Conflicting state: domain caps, duplicates, blocked disconnects.
    #[error("{0}")]
    Conflict(String),

    /// Malformed input.
    #[error("{0}")]
    Validation(String),

    /// The client exceeded the operation rate limit.
    #[error("too many requests, retry later")]
    RateLimited,

    /// A third-party platform call failed.
    #[error("{0}")]
    Upstream(String),

    /// Webhook authenticity check failed.
    #[error("{0}")]
    Signature(String),

    /// Unexpected internal failure.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// Returns the machine-stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Validation(_) => "validation_error",
            Self::RateLimited => "rate_limited",
            Self::Upstream(_) => "upstream_error",
            Self::Signature(_) => "signature_error",
            Self::Internal => "internal_error",
        }
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::Signature(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal) {
            error!("request failed with internal error");
        }
        let body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unsupported { .. } => Self::Validation(err.to_string()),
            _ => Self::Upstream(err.to_string()),
        }
    }
}

impl From<CredentialServiceError> for ApiError {
    fn from(err: CredentialServiceError) -> Self {
        match err {
            CredentialServiceError::ActiveProjectsExist { .. } => Self::Conflict(err.to_string()),
            CredentialServiceError::NotConnected { .. } => Self::NotFound(err.to_string()),
            CredentialServiceError::Cipher(_)
            | CredentialServiceError::Repository(_)
            | CredentialServiceError::Probe(_) => Self::Internal,
        }
    }
}

impl From<ProjectRegistryError> for ApiError {
    fn from(err: ProjectRegistryError) -> Self {
        match err {
            ProjectRegistryError::RepositoryNotFound(_)
            | ProjectRegistryError::ProjectNotFound(_) => Self::NotFound(err.to_string()),
            ProjectRegistryError::NotOwner => Self::Forbidden(err.to_string()),
            ProjectRegistryError::UnknownPlatform(_) => Self::Validation(err.to_string()),
            ProjectRegistryError::Domain(ref domain_err) => match domain_err {
                ProjectDomainError::UnknownDomain(_) => Self::NotFound(err.to_string()),
                _ => Self::Conflict(err.to_string()),
            },
            ProjectRegistryError::Provider(provider_err) => provider_err.into(),
            ProjectRegistryError::Credential(credential_err) => credential_err.into(),
            ProjectRegistryError::Repository(_) => Self::Internal,
        }
    }
}

impl From<DeploymentServiceError> for ApiError {
    fn from(err: DeploymentServiceError) -> Self {
        match err {
            DeploymentServiceError::ProjectNotFound(_)
            | DeploymentServiceError::NoDeployments(_) => Self::NotFound(err.to_string()),
            DeploymentServiceError::NotOwner => Self::Forbidden(err.to_string()),
            DeploymentServiceError::UnknownPlatform(_) => Self::Validation(err.to_string()),
            DeploymentServiceError::Provider(provider_err) => provider_err.into(),
            DeploymentServiceError::Credential(credential_err) => credential_err.into(),
            DeploymentServiceError::History(_) | DeploymentServiceError::Repository(_) => {
                Self::Internal
            }
        }
    }
}

impl From<ConnectFlowError> for ApiError {
    fn from(err: ConnectFlowError) -> Self {
        match err {
            ConnectFlowError::UnknownPlatform { .. }
            | ConnectFlowError::OAuthNotSupported { .. } => Self::Validation(err.to_string()),
            ConnectFlowError::InvalidState | ConnectFlowError::AuthorizationDenied { .. } => {
                Self::Unauthorized(err.to_string())
            }
            ConnectFlowError::Provider(provider_err) => provider_err.into(),
            ConnectFlowError::Credential(credential_err) => credential_err.into(),
            ConnectFlowError::Guard(_) => Self::Internal,
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        Self::Signature(err.to_string())
    }
}

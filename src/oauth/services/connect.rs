//! Authorization-code connect flow across guard, provider and store.

use super::guard::{StateGuardError, StateGuardService};
use crate::config::PlatformSettings;
use crate::credential::domain::UserId;
use crate::credential::services::{
    ConnectPlatformRequest, CredentialService, CredentialServiceError,
};
use crate::hosting::domain::Platform;
use crate::hosting::error::ProviderError;
use crate::hosting::registry::ProviderRegistry;
use thiserror::Error;
use tracing::warn;

/// The authorization URL and state token returned to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRedirect {
    /// URL the browser must visit to authorize the application.
    pub authorization_url: String,
    /// State token embedded in that URL, echoed back at the callback.
    pub state: String,
}

/// Service-level errors for the connect flow.
#[derive(Debug, Error)]
pub enum ConnectFlowError {
    /// The platform has no adapter bound in the registry.
    #[error("unsupported platform: {platform}")]
    UnknownPlatform {
        /// Platform without an adapter.
        platform: Platform,
    },

    /// The platform does not connect through OAuth.
    #[error("{platform} does not support OAuth authorization")]
    OAuthNotSupported {
        /// Platform without an OAuth flow.
        platform: Platform,
    },

    /// The platform redirected back with an error instead of a code.
    #[error("authorization failed: {message}")]
    AuthorizationDenied {
        /// Error description relayed from the platform.
        message: String,
    },

    /// The presented state token was missing, expired or mismatched.
    #[error("Invalid state parameter")]
    InvalidState,

    /// State guard failure.
    #[error(transparent)]
    Guard(#[from] StateGuardError),

    /// Provider adapter failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Credential store failure.
    #[error(transparent)]
    Credential(#[from] CredentialServiceError),
}

/// Result type for connect flow operations.
pub type ConnectFlowResult<T> = Result<T, ConnectFlowError>;

/// Completed-callback query parameters as sent by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    /// Authorization code, when the user approved.
    pub code: Option<String>,
    /// Echoed state token.
    pub state: Option<String>,
    /// Platform-supplied error, when the user denied or the flow failed.
    pub error: Option<String>,
}

/// Orchestrates the three-legged OAuth connect flow.
///
/// GitHub Pages never reaches this service: it reuses the primary GitHub
/// session token and the capability probe reports `supports_oauth` false.
#[derive(Clone)]
pub struct ConnectFlowService {
    registry: ProviderRegistry,
    guard: StateGuardService,
    credentials: CredentialService,
    settings: PlatformSettings,
}

impl ConnectFlowService {
    /// Creates a new connect flow service.
    #[must_use]
    pub const fn new(
        registry: ProviderRegistry,
        guard: StateGuardService,
        credentials: CredentialService,
        settings: PlatformSettings,
    ) -> Self {
        Self {
            registry,
            guard,
            credentials,
            settings,
        }
    }

    /// Starts the flow: issues a state token and builds the authorization
    /// URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectFlowError::OAuthNotSupported`] for platforms without
    /// an OAuth flow, or an error from the guard or adapter.
    pub async fn begin(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> ConnectFlowResult<AuthorizationRedirect> {
        let provider = self
            .registry
            .get(platform)
            .ok_or(ConnectFlowError::UnknownPlatform { platform })?;
        if !provider.capabilities().supports_oauth() {
            return Err(ConnectFlowError::OAuthNotSupported { platform });
        }

        let state = self.guard.issue(user_id, platform).await?;
        let redirect_uri = self.settings.redirect_uri(platform);
        let url = provider.authorization_url(&redirect_uri, state.token())?;

        Ok(AuthorizationRedirect {
            authorization_url: url.into(),
            state: state.token().to_owned(),
        })
    }

    /// Completes the flow from the callback parameters.
    ///
    /// The state token is validated and consumed before anything else; the
    /// authorization code is never exchanged when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectFlowError::InvalidState`] for missing, expired or
    /// mismatched state, [`ConnectFlowError::AuthorizationDenied`] when the
    /// platform reported an error, or an error from the exchange or store.
    pub async fn complete(
        &self,
        user_id: UserId,
        platform: Platform,
        params: CallbackParams,
    ) -> ConnectFlowResult<()> {
        let state = params.state.as_deref().unwrap_or_default();
        let verdict = self.guard.consume(state, user_id, platform).await?;
        if !verdict.is_valid() {
            warn!(%platform, ?verdict, "rejecting oauth callback with invalid state");
            return Err(ConnectFlowError::InvalidState);
        }

        if let Some(message) = params.error {
            return Err(ConnectFlowError::AuthorizationDenied { message });
        }
        let Some(code) = params.code else {
            return Err(ConnectFlowError::AuthorizationDenied {
                message: "missing authorization code".to_owned(),
            });
        };

        let provider = self
            .registry
            .get(platform)
            .ok_or(ConnectFlowError::UnknownPlatform { platform })?;
        let redirect_uri = self.settings.redirect_uri(platform);
        let access_token = provider.exchange_code(&code, &redirect_uri).await?;

        self.credentials
            .connect(user_id, ConnectPlatformRequest::new(platform, access_token))
            .await?;
        Ok(())
    }
}

//! Shared application state for the HTTP surface.

use super::auth::Authenticator;
use super::rate_limit::RateLimiter;
use crate::config::PlatformSettings;
use crate::credential::services::CredentialService;
use crate::deployment::services::DeploymentService;
use crate::hosting::registry::ProviderRegistry;
use crate::oauth::services::ConnectFlowService;
use crate::project::services::ProjectRegistryService;
use crate::webhook::services::WebhookIngestor;
use std::sync::Arc;

/// Everything a request handler needs, built once at startup and shared.
#[derive(Clone)]
pub struct AppState {
    pub(super) settings: PlatformSettings,
    pub(super) providers: ProviderRegistry,
    pub(super) credentials: CredentialService,
    pub(super) connect_flow: ConnectFlowService,
    pub(super) projects: ProjectRegistryService,
    pub(super) deployments: DeploymentService,
    pub(super) ingestor: WebhookIngestor,
    pub(super) authenticator: Arc<dyn Authenticator>,
    pub(super) limiter: RateLimiter,
}

impl AppState {
    /// Assembles the application state from its services.
    #[expect(
        clippy::too_many_arguments,
        reason = "startup wiring gathers every service handle exactly once"
    )]
    #[must_use]
    pub fn new(
        settings: PlatformSettings,
        providers: ProviderRegistry,
        credentials: CredentialService,
        connect_flow: ConnectFlowService,
        projects: ProjectRegistryService,
        deployments: DeploymentService,
        ingestor: WebhookIngestor,
        authenticator: Arc<dyn Authenticator>,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            settings,
            providers,
            credentials,
            connect_flow,
            projects,
            deployments,
            ingestor,
            authenticator,
            limiter,
        }
    }
}

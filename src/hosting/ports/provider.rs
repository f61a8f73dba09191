//! Provider port: one capability contract per hosting platform.

use crate::hosting::domain::{
    AutoSetup, DeployOutcome, DeployRequest, DnsRecord, DomainAttachment, LogPage,
    PlatformCapabilities, Platform, ProjectConfig, ProjectSnapshot, ProviderCredentials,
    StatusReport,
};
use crate::hosting::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use url::Url;

/// Uniform deployment contract implemented by each platform adapter.
///
/// The abstraction normalizes around the lowest common denominator of "a
/// deployable unit with a production URL, zero or more custom domains, and a
/// history of deployment attempts". Operations a platform has no equivalent
/// for keep their default body, which returns
/// [`ProviderError::Unsupported`]; callers consult [`Self::capabilities`]
/// before invoking optional operations.
#[async_trait]
pub trait HostingProvider: Send + Sync {
    /// Returns the platform this adapter serves.
    fn platform(&self) -> Platform;

    /// Returns the platform's capability descriptor.
    fn capabilities(&self) -> PlatformCapabilities {
        self.platform().capabilities()
    }

    /// Builds the authorization URL for the OAuth code flow.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unsupported`] for platforms connected without
    /// OAuth.
    fn authorization_url(&self, _redirect_uri: &str, _state: &str) -> ProviderResult<Url> {
        Err(ProviderError::unsupported(
            self.platform(),
            "authorization_url",
        ))
    }

    /// Exchanges an OAuth authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unsupported`] for platforms connected without
    /// OAuth, or an upstream error from the token endpoint.
    async fn exchange_code(&self, _code: &str, _redirect_uri: &str) -> ProviderResult<String> {
        Err(ProviderError::unsupported(self.platform(), "exchange_code"))
    }

    /// Validates that the credentials authorize API calls.
    ///
    /// Used before storing manually entered tokens.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the platform rejects the token.
    async fn verify_credentials(&self, credentials: &ProviderCredentials) -> ProviderResult<()>;

    /// Creates a deployable project linked to a source repository.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the platform rejects the request.
    async fn create_project(
        &self,
        credentials: &ProviderCredentials,
        config: &ProjectConfig,
    ) -> ProviderResult<ProjectSnapshot>;

    /// Creates a project and kicks off its first deployment in one step.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when any step fails; partial setup is not
    /// rolled back.
    async fn auto_setup(
        &self,
        credentials: &ProviderCredentials,
        config: &ProjectConfig,
    ) -> ProviderResult<AutoSetup>;

    /// Triggers one deployment attempt.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the platform rejects the trigger.
    async fn deploy(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        request: &DeployRequest,
    ) -> ProviderResult<DeployOutcome>;

    /// Fetches the platform's current view of a project.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the project cannot be read.
    async fn project_snapshot(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
    ) -> ProviderResult<ProjectSnapshot>;

    /// Deletes the project on the platform.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when deletion fails; callers treat this as
    /// best-effort.
    async fn delete_project(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
    ) -> ProviderResult<()>;

    /// Polls the status of one deployment attempt.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the deployment cannot be read.
    async fn deployment_status(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        deployment_id: &str,
    ) -> ProviderResult<StatusReport>;

    /// Fetches one page of build logs for a deployment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unsupported`] for platforms without build
    /// logs, or an upstream error.
    async fn deployment_logs(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
        _deployment_id: &str,
        _cursor: Option<&str>,
    ) -> ProviderResult<LogPage> {
        Err(ProviderError::unsupported(
            self.platform(),
            "deployment_logs",
        ))
    }

    /// Attaches a custom domain to the project.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when the platform rejects the domain.
    async fn attach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<DomainAttachment>;

    /// Returns the DNS records required to point a domain at the project.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when instructions cannot be derived.
    async fn dns_instructions(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<Vec<DnsRecord>>;

    /// Removes a custom domain from the project.
    ///
    /// Returns `false` when the platform reports the domain was not attached.
    ///
    /// # Errors
    ///
    /// Returns an upstream error when removal fails.
    async fn detach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<bool>;
}

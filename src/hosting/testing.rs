//! Provider test double shared by unit tests across contexts.

use crate::deployment::domain::DeploymentStatus;
use crate::hosting::domain::{
    AutoSetup, DeployOutcome, DeployRequest, DnsRecord, DomainAttachment, LogEntry, LogPage,
    Platform, ProjectConfig, ProjectSnapshot, ProviderCredentials, StatusReport,
};
use crate::hosting::error::{ProviderError, ProviderResult};
use crate::hosting::ports::HostingProvider;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// Configurable in-memory provider.
///
/// Successful by default; individual operations can be made to fail to
/// exercise provider-first semantics and best-effort paths.
pub(crate) struct StubProvider {
    platform: Platform,
    fail_attach_domain: bool,
    fail_delete_project: bool,
    fail_deploy: bool,
    deploys: AtomicUsize,
    exchanged_codes: Mutex<Vec<String>>,
    status_report: Mutex<Option<StatusReport>>,
}

impl StubProvider {
    /// Creates a provider where every operation succeeds.
    pub(crate) fn new(platform: Platform) -> Self {
        Self {
            platform,
            fail_attach_domain: false,
            fail_delete_project: false,
            fail_deploy: false,
            deploys: AtomicUsize::new(0),
            exchanged_codes: Mutex::new(Vec::new()),
            status_report: Mutex::new(None),
        }
    }

    /// Makes `attach_domain` fail with an API error.
    pub(crate) const fn with_failing_attach_domain(mut self) -> Self {
        self.fail_attach_domain = true;
        self
    }

    /// Makes `delete_project` fail with an API error.
    pub(crate) const fn with_failing_delete_project(mut self) -> Self {
        self.fail_delete_project = true;
        self
    }

    /// Makes `deploy` fail with an API error.
    pub(crate) const fn with_failing_deploy(mut self) -> Self {
        self.fail_deploy = true;
        self
    }

    /// Sets the report returned by `deployment_status`.
    pub(crate) fn set_status_report(&self, report: StatusReport) {
        if let Ok(mut slot) = self.status_report.lock() {
            *slot = Some(report);
        }
    }

    /// Returns the codes passed to `exchange_code` so far.
    pub(crate) fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged_codes
            .lock()
            .map(|codes| codes.clone())
            .unwrap_or_default()
    }

    fn snapshot(&self, name: &str) -> ProjectSnapshot {
        ProjectSnapshot {
            external_id: format!("ext-{name}"),
            name: name.to_owned(),
            production_url: Some(format!("https://{name}.stub.app")),
            custom_domains: Vec::new(),
        }
    }
}

#[async_trait]
impl HostingProvider for StubProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn authorization_url(&self, redirect_uri: &str, state: &str) -> ProviderResult<Url> {
        Url::parse(&format!(
            "https://auth.stub.app/authorize?redirect_uri={redirect_uri}&state={state}"
        ))
        .map_err(|err| ProviderError::unexpected(self.platform, err.to_string()))
    }

    async fn exchange_code(&self, code: &str, _redirect_uri: &str) -> ProviderResult<String> {
        if let Ok(mut codes) = self.exchanged_codes.lock() {
            codes.push(code.to_owned());
        }
        Ok(format!("tok-exchanged-{code}"))
    }

    async fn verify_credentials(&self, _credentials: &ProviderCredentials) -> ProviderResult<()> {
        Ok(())
    }

    async fn create_project(
        &self,
        _credentials: &ProviderCredentials,
        config: &ProjectConfig,
    ) -> ProviderResult<ProjectSnapshot> {
        Ok(self.snapshot(config.name()))
    }

    async fn auto_setup(
        &self,
        credentials: &ProviderCredentials,
        config: &ProjectConfig,
    ) -> ProviderResult<AutoSetup> {
        let project = self.create_project(credentials, config).await?;
        let deployment = self
            .deploy(
                credentials,
                &project.external_id,
                &DeployRequest::production(config.production_branch()),
            )
            .await?;
        Ok(AutoSetup {
            project,
            deployment: Some(deployment),
        })
    }

    async fn deploy(
        &self,
        _credentials: &ProviderCredentials,
        external_id: &str,
        _request: &DeployRequest,
    ) -> ProviderResult<DeployOutcome> {
        if self.fail_deploy {
            return Err(ProviderError::api(self.platform, "deploy was rejected"));
        }
        let sequence = self.deploys.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(DeployOutcome {
            external_deployment_id: format!("dep-{sequence}"),
            deployment_url: Some(format!("https://{external_id}.stub.app")),
            preview_url: None,
        })
    }

    async fn project_snapshot(
        &self,
        _credentials: &ProviderCredentials,
        external_id: &str,
    ) -> ProviderResult<ProjectSnapshot> {
        Ok(self.snapshot(external_id))
    }

    async fn delete_project(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
    ) -> ProviderResult<()> {
        if self.fail_delete_project {
            return Err(ProviderError::connection(self.platform, "unreachable"));
        }
        Ok(())
    }

    async fn deployment_status(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
        _deployment_id: &str,
    ) -> ProviderResult<StatusReport> {
        let stored = self
            .status_report
            .lock()
            .ok()
            .and_then(|slot| slot.clone());
        Ok(stored.unwrap_or_else(|| StatusReport {
            status: DeploymentStatus::Building,
            deployment_url: None,
            preview_url: None,
            created_at: None,
            completed_at: None,
            error: None,
        }))
    }

    async fn deployment_logs(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
        deployment_id: &str,
        cursor: Option<&str>,
    ) -> ProviderResult<LogPage> {
        Ok(LogPage {
            entries: vec![LogEntry {
                timestamp: None,
                level: Some("info".to_owned()),
                message: format!(
                    "log line for {deployment_id} from cursor {}",
                    cursor.unwrap_or("start")
                ),
            }],
            has_more: false,
            next_cursor: None,
        })
    }

    async fn attach_domain(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
        domain: &str,
    ) -> ProviderResult<DomainAttachment> {
        if self.fail_attach_domain {
            return Err(ProviderError::api(self.platform, "domain was rejected"));
        }
        Ok(DomainAttachment {
            configured: true,
            verified: false,
            dns_records: vec![DnsRecord::new("CNAME", domain, "target.stub.app")],
        })
    }

    async fn dns_instructions(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
        domain: &str,
    ) -> ProviderResult<Vec<DnsRecord>> {
        Ok(vec![DnsRecord::new("CNAME", domain, "target.stub.app")])
    }

    async fn detach_domain(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
        _domain: &str,
    ) -> ProviderResult<bool> {
        Ok(true)
    }
}

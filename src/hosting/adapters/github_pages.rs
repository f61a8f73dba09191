//! GitHub Pages provider adapter.
//!
//! GitHub Pages has no first-class project: the repository itself is the
//! deployable unit, `owner/repo` serves as the external project identifier,
//! and a deploy is a Pages build request. Connection reuses the primary
//! GitHub session token, so the OAuth operations keep their unsupported
//! defaults.

use super::http::{expect_json, expect_success, optional_str, parse_timestamp, require_str};
use crate::deployment::domain::DeploymentStatus;
use crate::hosting::domain::{
    AutoSetup, DeployOutcome, DeployRequest, DnsRecord, DomainAttachment, Platform, ProjectConfig,
    ProjectSnapshot, ProviderCredentials, StatusReport,
};
use crate::hosting::error::{ProviderError, ProviderResult};
use crate::hosting::ports::HostingProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

const API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "halyard-deploy";

/// Provider adapter for GitHub Pages.
#[derive(Debug, Clone)]
pub struct GithubPagesProvider {
    client: Client,
}

impl GithubPagesProvider {
    /// Creates the adapter with a shared HTTP client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        token: &str,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{API_BASE}{path}"))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
    }

    async fn pages_site(
        &self,
        credentials: &ProviderCredentials,
        slug: &str,
    ) -> ProviderResult<Value> {
        expect_json(
            Platform::GithubPages,
            self.request(
                reqwest::Method::GET,
                &format!("/repos/{slug}/pages"),
                credentials.access_token(),
            ),
        )
        .await
    }

    fn snapshot_from_site(slug: &str, site: &Value) -> ProjectSnapshot {
        let custom_domains = optional_str(site, "/cname").into_iter().collect();
        ProjectSnapshot {
            external_id: slug.to_owned(),
            name: slug.to_owned(),
            production_url: optional_str(site, "/html_url"),
            custom_domains,
        }
    }
}

fn map_build_status(raw: &str) -> DeploymentStatus {
    match raw {
        "built" => DeploymentStatus::Success,
        "building" => DeploymentStatus::Building,
        "errored" => DeploymentStatus::Failed,
        _ => DeploymentStatus::Pending,
    }
}

/// Extracts the build identifier from a Pages build resource URL.
///
/// The API identifies builds by the trailing URL segment (`latest` or a
/// numeric id).
fn build_id_from_url(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("latest")
        .to_owned()
}

#[async_trait]
impl HostingProvider for GithubPagesProvider {
    fn platform(&self) -> Platform {
        Platform::GithubPages
    }

    async fn verify_credentials(&self, credentials: &ProviderCredentials) -> ProviderResult<()> {
        expect_success(
            self.platform(),
            self.request(reqwest::Method::GET, "/user", credentials.access_token()),
        )
        .await
    }

    async fn create_project(
        &self,
        credentials: &ProviderCredentials,
        config: &ProjectConfig,
    ) -> ProviderResult<ProjectSnapshot> {
        let slug = config.repo_slug();
        let body = json!({
            "source": {
                "branch": config.production_branch(),
                "path": "/",
            }
        });

        let enabled = expect_success(
            self.platform(),
            self.request(
                reqwest::Method::POST,
                &format!("/repos/{slug}/pages"),
                credentials.access_token(),
            )
            .json(&body),
        )
        .await;

        // A conflict means Pages is already enabled for the repository;
        // re-running setup reads the existing site instead.
        match enabled {
            Ok(()) => {}
            Err(ProviderError::Api { ref message, .. }) if message.starts_with("HTTP 409") => {}
            Err(err) => return Err(err),
        }

        let site = self.pages_site(credentials, &slug).await?;
        Ok(Self::snapshot_from_site(&slug, &site))
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
        credentials: &ProviderCredentials,
        external_id: &str,
        _request: &DeployRequest,
    ) -> ProviderResult<DeployOutcome> {
        // Pages always builds the configured source branch; branch and commit
        // selection happen on the repository side.
        let build = expect_json(
            self.platform(),
            self.request(
                reqwest::Method::POST,
                &format!("/repos/{external_id}/pages/builds"),
                credentials.access_token(),
            ),
        )
        .await?;

        let build_url = require_str(self.platform(), &build, "/url")?;
        Ok(DeployOutcome {
            external_deployment_id: build_id_from_url(&build_url),
            deployment_url: None,
            preview_url: None,
        })
    }

    async fn project_snapshot(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
    ) -> ProviderResult<ProjectSnapshot> {
        let site = self.pages_site(credentials, external_id).await?;
        Ok(Self::snapshot_from_site(external_id, &site))
    }

    async fn delete_project(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
    ) -> ProviderResult<()> {
        expect_success(
            self.platform(),
            self.request(
                reqwest::Method::DELETE,
                &format!("/repos/{external_id}/pages"),
                credentials.access_token(),
            ),
        )
        .await
    }

    async fn deployment_status(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        deployment_id: &str,
    ) -> ProviderResult<StatusReport> {
        let build = expect_json(
            self.platform(),
            self.request(
                reqwest::Method::GET,
                &format!("/repos/{external_id}/pages/builds/{deployment_id}"),
                credentials.access_token(),
            ),
        )
        .await?;

        let raw_status = require_str(self.platform(), &build, "/status")?;
        let site = self.pages_site(credentials, external_id).await.ok();
        let deployment_url = site
            .as_ref()
            .and_then(|value| optional_str(value, "/html_url"));

        Ok(StatusReport {
            status: map_build_status(&raw_status),
            deployment_url,
            preview_url: None,
            created_at: parse_timestamp(&build, "/created_at"),
            completed_at: parse_timestamp(&build, "/updated_at"),
            error: optional_str(&build, "/error/message"),
        })
    }

    async fn attach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<DomainAttachment> {
        expect_success(
            self.platform(),
            self.request(
                reqwest::Method::PUT,
                &format!("/repos/{external_id}/pages"),
                credentials.access_token(),
            )
            .json(&json!({ "cname": domain })),
        )
        .await?;

        let dns_records = self
            .dns_instructions(credentials, external_id, domain)
            .await?;
        Ok(DomainAttachment {
            configured: true,
            verified: false,
            dns_records,
        })
    }

    async fn dns_instructions(
        &self,
        _credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<Vec<DnsRecord>> {
        let owner = external_id.split('/').next().unwrap_or(external_id);
        Ok(vec![DnsRecord::new(
            "CNAME",
            domain,
            format!("{owner}.github.io"),
        )])
    }

    async fn detach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        _domain: &str,
    ) -> ProviderResult<bool> {
        expect_success(
            self.platform(),
            self.request(
                reqwest::Method::PUT,
                &format!("/repos/{external_id}/pages"),
                credentials.access_token(),
            )
            .json(&json!({ "cname": Value::Null })),
        )
        .await?;
        Ok(true)
    }
}

//! Netlify provider adapter.

use super::http::{
    expect_json, expect_success, optional_str, parse_timestamp, require_str, string_array,
};
use crate::config::OAuthClientConfig;
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
use url::Url;

const API_BASE: &str = "https://api.netlify.com/api/v1";
const TOKEN_URL: &str = "https://api.netlify.com/oauth/token";
const AUTHORIZE_URL: &str = "https://app.netlify.com/authorize";

/// Provider adapter for Netlify.
#[derive(Debug, Clone)]
pub struct NetlifyProvider {
    client: Client,
    oauth: Option<OAuthClientConfig>,
}

impl NetlifyProvider {
    /// Creates the adapter with a shared HTTP client and optional OAuth
    /// application credentials.
    #[must_use]
    pub const fn new(client: Client, oauth: Option<OAuthClientConfig>) -> Self {
        Self { client, oauth }
    }

    fn oauth_config(&self) -> ProviderResult<&OAuthClientConfig> {
        self.oauth
            .as_ref()
            .ok_or_else(|| ProviderError::api(Platform::Netlify, "OAuth client is not configured"))
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        credentials: &ProviderCredentials,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{API_BASE}{path}"))
            .bearer_auth(credentials.access_token())
    }

    async fn site(
        &self,
        credentials: &ProviderCredentials,
        site_id: &str,
    ) -> ProviderResult<Value> {
        expect_json(
            self.platform(),
            self.request(
                reqwest::Method::GET,
                &format!("/sites/{site_id}"),
                credentials,
            ),
        )
        .await
    }

    fn snapshot_from_site(platform: Platform, site: &Value) -> ProviderResult<ProjectSnapshot> {
        let mut custom_domains: Vec<String> =
            optional_str(site, "/custom_domain").into_iter().collect();
        custom_domains.extend(string_array(
            site.pointer("/domain_aliases").unwrap_or(&Value::Null),
        ));
        Ok(ProjectSnapshot {
            external_id: require_str(platform, site, "/id")?,
            name: require_str(platform, site, "/name")?,
            production_url: optional_str(site, "/ssl_url").or_else(|| optional_str(site, "/url")),
            custom_domains,
        })
    }

    /// Writes the full domain set back to the site.
    ///
    /// Netlify models domains as one `custom_domain` plus `domain_aliases`;
    /// the first entry becomes the primary domain.
    async fn put_domains(
        &self,
        credentials: &ProviderCredentials,
        site_id: &str,
        domains: &[String],
    ) -> ProviderResult<()> {
        let (primary, aliases) = match domains.split_first() {
            Some((first, rest)) => (Value::String(first.clone()), rest.to_vec()),
            None => (Value::Null, Vec::new()),
        };
        expect_success(
            self.platform(),
            self.request(
                reqwest::Method::PUT,
                &format!("/sites/{site_id}"),
                credentials,
            )
            .json(&json!({
                "custom_domain": primary,
                "domain_aliases": aliases,
            })),
        )
        .await
    }
}

fn map_deploy_state(raw: &str) -> DeploymentStatus {
    match raw {
        "ready" | "current" => DeploymentStatus::Success,
        "error" => DeploymentStatus::Failed,
        "building" | "processing" | "uploading" | "uploaded" => DeploymentStatus::Building,
        "canceled" => DeploymentStatus::Cancelled,
        _ => DeploymentStatus::Pending,
    }
}

fn report_from_deploy(platform: Platform, deploy: &Value) -> ProviderResult<StatusReport> {
    let state = require_str(platform, deploy, "/state")?;
    Ok(StatusReport {
        status: map_deploy_state(&state),
        deployment_url: optional_str(deploy, "/ssl_url").or_else(|| optional_str(deploy, "/url")),
        preview_url: optional_str(deploy, "/deploy_ssl_url"),
        created_at: parse_timestamp(deploy, "/created_at"),
        completed_at: parse_timestamp(deploy, "/published_at"),
        error: optional_str(deploy, "/error_message"),
    })
}

#[async_trait]
impl HostingProvider for NetlifyProvider {
    fn platform(&self) -> Platform {
        Platform::Netlify
    }

    fn authorization_url(&self, redirect_uri: &str, state: &str) -> ProviderResult<Url> {
        let oauth = self.oauth_config()?;
        let mut url = Url::parse(AUTHORIZE_URL)
            .map_err(|err| ProviderError::unexpected(self.platform(), err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", oauth.client_id())
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("state", state);
        Ok(url)
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> ProviderResult<String> {
        let oauth = self.oauth_config()?;
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", oauth.client_id()),
            ("client_secret", oauth.client_secret()),
            ("redirect_uri", redirect_uri),
        ];
        let token = expect_json(self.platform(), self.client.post(TOKEN_URL).form(&form)).await?;
        require_str(self.platform(), &token, "/access_token")
    }

    async fn verify_credentials(&self, credentials: &ProviderCredentials) -> ProviderResult<()> {
        expect_success(
            self.platform(),
            self.request(reqwest::Method::GET, "/user", credentials),
        )
        .await
    }

    async fn create_project(
        &self,
        credentials: &ProviderCredentials,
        config: &ProjectConfig,
    ) -> ProviderResult<ProjectSnapshot> {
        let body = json!({
            "name": config.name(),
            "repo": {
                "provider": "github",
                "repo": config.repo_slug(),
                "branch": config.production_branch(),
            },
        });
        let site = expect_json(
            self.platform(),
            self.request(reqwest::Method::POST, "/sites", credentials)
                .json(&body),
        )
        .await?;
        Self::snapshot_from_site(self.platform(), &site)
    }

    async fn auto_setup(
        &self,
        credentials: &ProviderCredentials,
        config: &ProjectConfig,
    ) -> ProviderResult<AutoSetup> {
        // Linking a repository makes Netlify start the first build on its
        // own; surface it when it is already visible.
        let project = self.create_project(credentials, config).await?;
        let deploys = expect_json(
            self.platform(),
            self.request(
                reqwest::Method::GET,
                &format!("/sites/{}/deploys?per_page=1", project.external_id),
                credentials,
            ),
        )
        .await?;
        let deployment = deploys
            .as_array()
            .and_then(|items| items.first())
            .and_then(|deploy| {
                optional_str(deploy, "/id").map(|id| DeployOutcome {
                    external_deployment_id: id,
                    deployment_url: optional_str(deploy, "/ssl_url"),
                    preview_url: optional_str(deploy, "/deploy_ssl_url"),
                })
            });
        Ok(AutoSetup {
            project,
            deployment,
        })
    }

    async fn deploy(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        request: &DeployRequest,
    ) -> ProviderResult<DeployOutcome> {
        let build = expect_json(
            self.platform(),
            self.request(
                reqwest::Method::POST,
                &format!("/sites/{external_id}/builds"),
                credentials,
            )
            .json(&json!({ "clear_cache": false, "branch": request.branch() })),
        )
        .await?;

        let deploy_id = optional_str(&build, "/deploy_id")
            .or_else(|| optional_str(&build, "/id"))
            .ok_or_else(|| {
                ProviderError::unexpected(self.platform(), "missing field `deploy_id`")
            })?;
        Ok(DeployOutcome {
            external_deployment_id: deploy_id,
            deployment_url: None,
            preview_url: None,
        })
    }

    async fn project_snapshot(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
    ) -> ProviderResult<ProjectSnapshot> {
        let site = self.site(credentials, external_id).await?;
        Self::snapshot_from_site(self.platform(), &site)
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
                &format!("/sites/{external_id}"),
                credentials,
            ),
        )
        .await
    }

    async fn deployment_status(
        &self,
        credentials: &ProviderCredentials,
        _external_id: &str,
        deployment_id: &str,
    ) -> ProviderResult<StatusReport> {
        let deploy = expect_json(
            self.platform(),
            self.request(
                reqwest::Method::GET,
                &format!("/deploys/{deployment_id}"),
                credentials,
            ),
        )
        .await?;
        report_from_deploy(self.platform(), &deploy)
    }

    async fn attach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<DomainAttachment> {
        let site = self.site(credentials, external_id).await?;
        let snapshot = Self::snapshot_from_site(self.platform(), &site)?;

        let mut domains = snapshot.custom_domains;
        if !domains.iter().any(|existing| existing == domain) {
            domains.push(domain.to_owned());
        }
        self.put_domains(credentials, external_id, &domains).await?;

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
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<Vec<DnsRecord>> {
        let site = self.site(credentials, external_id).await?;
        let target = optional_str(&site, "/name")
            .map_or_else(|| "apex-loadbalancer.netlify.com".to_owned(), |name| {
                format!("{name}.netlify.app")
            });
        Ok(vec![DnsRecord::new("CNAME", domain, target)])
    }

    async fn detach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<bool> {
        let site = self.site(credentials, external_id).await?;
        let snapshot = Self::snapshot_from_site(self.platform(), &site)?;

        let mut domains = snapshot.custom_domains;
        let before = domains.len();
        domains.retain(|existing| existing != domain);
        if domains.len() == before {
            return Ok(false);
        }
        self.put_domains(credentials, external_id, &domains).await?;
        Ok(true)
    }
}

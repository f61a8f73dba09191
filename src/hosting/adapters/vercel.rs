//! Vercel provider adapter.

use super::http::{
    expect_json, expect_success, expect_success_or_missing, optional_str, require_str,
};
use crate::config::OAuthClientConfig;
use crate::deployment::domain::DeploymentStatus;
use crate::hosting::domain::{
    AutoSetup, DeployOutcome, DeployRequest, DnsRecord, DomainAttachment, LogEntry, LogPage,
    Platform, ProjectConfig, ProjectSnapshot, ProviderCredentials, StatusReport,
};
use crate::hosting::error::{ProviderError, ProviderResult};
use crate::hosting::ports::HostingProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

const API_BASE: &str = "https://api.vercel.com";
const AUTHORIZE_URL: &str = "https://vercel.com/oauth/authorize";
const LOG_PAGE_LIMIT: usize = 100;

/// Provider adapter for Vercel.
#[derive(Debug, Clone)]
pub struct VercelProvider {
    client: Client,
    oauth: Option<OAuthClientConfig>,
}

impl VercelProvider {
    /// Creates the adapter with a shared HTTP client and optional OAuth
    /// application credentials.
    #[must_use]
    pub const fn new(client: Client, oauth: Option<OAuthClientConfig>) -> Self {
        Self { client, oauth }
    }

    fn oauth_config(&self) -> ProviderResult<&OAuthClientConfig> {
        self.oauth
            .as_ref()
            .ok_or_else(|| ProviderError::api(Platform::Vercel, "OAuth client is not configured"))
    }

    /// Builds a request URL, appending the team scope when present.
    fn api_url(path: &str, credentials: &ProviderCredentials) -> String {
        credentials.team_id().map_or_else(
            || format!("{API_BASE}{path}"),
            |team| {
                let separator = if path.contains('?') { '&' } else { '?' };
                format!("{API_BASE}{path}{separator}teamId={team}")
            },
        )
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        credentials: &ProviderCredentials,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, Self::api_url(path, credentials))
            .bearer_auth(credentials.access_token())
    }
}

fn map_ready_state(raw: &str) -> DeploymentStatus {
    match raw.to_ascii_uppercase().as_str() {
        "READY" => DeploymentStatus::Success,
        "ERROR" => DeploymentStatus::Failed,
        "CANCELED" => DeploymentStatus::Cancelled,
        "BUILDING" | "INITIALIZING" | "DEPLOYING" => DeploymentStatus::Building,
        _ => DeploymentStatus::Pending,
    }
}

/// Normalizes Vercel's schemeless `url` fields.
fn absolute_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_owned()
    } else {
        format!("https://{raw}")
    }
}

#[async_trait]
impl HostingProvider for VercelProvider {
    fn platform(&self) -> Platform {
        Platform::Vercel
    }

    fn authorization_url(&self, redirect_uri: &str, state: &str) -> ProviderResult<Url> {
        let oauth = self.oauth_config()?;
        let mut url = Url::parse(AUTHORIZE_URL)
            .map_err(|err| ProviderError::unexpected(self.platform(), err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client_id", oauth.client_id())
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("state", state);
        Ok(url)
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> ProviderResult<String> {
        let oauth = self.oauth_config()?;
        let form = [
            ("client_id", oauth.client_id()),
            ("client_secret", oauth.client_secret()),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];
        let token = expect_json(
            self.platform(),
            self.client
                .post(format!("{API_BASE}/v2/oauth/access_token"))
                .form(&form),
        )
        .await?;
        require_str(self.platform(), &token, "/access_token")
    }

    async fn verify_credentials(&self, credentials: &ProviderCredentials) -> ProviderResult<()> {
        expect_success(
            self.platform(),
            self.request(reqwest::Method::GET, "/v2/user", credentials),
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
            "gitRepository": {
                "type": "github",
                "repo": config.repo_slug(),
            },
        });
        let project = expect_json(
            self.platform(),
            self.request(reqwest::Method::POST, "/v10/projects", credentials)
                .json(&body),
        )
        .await?;

        let name = require_str(self.platform(), &project, "/name")?;
        Ok(ProjectSnapshot {
            external_id: require_str(self.platform(), &project, "/id")?,
            production_url: Some(format!("https://{name}.vercel.app")),
            name,
            custom_domains: Vec::new(),
        })
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
        request: &DeployRequest,
    ) -> ProviderResult<DeployOutcome> {
        let mut git_source = json!({
            "type": "github",
            "ref": request.branch(),
        });
        if let (Some(sha), Some(source)) = (request.commit_sha(), git_source.as_object_mut()) {
            source.insert("sha".to_owned(), Value::String(sha.to_owned()));
        }

        let target = if request.is_production() {
            "production"
        } else {
            "preview"
        };
        let body = json!({
            "name": external_id,
            "project": external_id,
            "gitSource": git_source,
            "target": target,
        });
        let deployment = expect_json(
            self.platform(),
            self.request(reqwest::Method::POST, "/v13/deployments", credentials)
                .json(&body),
        )
        .await?;

        let url = optional_str(&deployment, "/url").map(|raw| absolute_url(&raw));
        Ok(DeployOutcome {
            external_deployment_id: require_str(self.platform(), &deployment, "/id")?,
            preview_url: if request.is_production() {
                None
            } else {
                url.clone()
            },
            deployment_url: url,
        })
    }

    async fn project_snapshot(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
    ) -> ProviderResult<ProjectSnapshot> {
        let project = expect_json(
            self.platform(),
            self.request(
                reqwest::Method::GET,
                &format!("/v9/projects/{external_id}"),
                credentials,
            ),
        )
        .await?;
        let domains = expect_json(
            self.platform(),
            self.request(
                reqwest::Method::GET,
                &format!("/v9/projects/{external_id}/domains"),
                credentials,
            ),
        )
        .await?;

        let name = require_str(self.platform(), &project, "/name")?;
        let custom_domains = domains
            .pointer("/domains")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| optional_str(item, "/name"))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ProjectSnapshot {
            external_id: external_id.to_owned(),
            production_url: Some(format!("https://{name}.vercel.app")),
            name,
            custom_domains,
        })
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
                &format!("/v9/projects/{external_id}"),
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
        let deployment = expect_json(
            self.platform(),
            self.request(
                reqwest::Method::GET,
                &format!("/v13/deployments/{deployment_id}"),
                credentials,
            ),
        )
        .await?;

        let ready_state = require_str(self.platform(), &deployment, "/readyState")?;
        let url = optional_str(&deployment, "/url").map(|raw| absolute_url(&raw));
        let is_production = deployment
            .pointer("/target")
            .and_then(Value::as_str)
            .is_some_and(|target| target == "production");

        Ok(StatusReport {
            status: map_ready_state(&ready_state),
            preview_url: if is_production { None } else { url.clone() },
            deployment_url: url,
            created_at: deployment
                .pointer("/createdAt")
                .and_then(Value::as_i64)
                .and_then(chrono::DateTime::from_timestamp_millis),
            completed_at: deployment
                .pointer("/ready")
                .and_then(Value::as_i64)
                .and_then(chrono::DateTime::from_timestamp_millis),
            error: optional_str(&deployment, "/errorMessage"),
        })
    }

    async fn deployment_logs(
        &self,
        credentials: &ProviderCredentials,
        _external_id: &str,
        deployment_id: &str,
        cursor: Option<&str>,
    ) -> ProviderResult<LogPage> {
        let mut path = format!("/v3/deployments/{deployment_id}/events?limit={LOG_PAGE_LIMIT}");
        if let Some(since) = cursor {
            path.push_str(&format!("&since={since}"));
        }
        let events = expect_json(
            self.platform(),
            self.request(reqwest::Method::GET, &path, credentials),
        )
        .await?;

        let entries: Vec<LogEntry> = events
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|item| LogEntry {
                        timestamp: item
                            .pointer("/created")
                            .and_then(Value::as_i64)
                            .and_then(chrono::DateTime::from_timestamp_millis),
                        level: optional_str(item, "/type"),
                        message: optional_str(item, "/payload/text").unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let next_cursor = entries
            .last()
            .and_then(|entry| entry.timestamp)
            .map(|timestamp| timestamp.timestamp_millis().to_string());
        Ok(LogPage {
            has_more: entries.len() == LOG_PAGE_LIMIT,
            next_cursor,
            entries,
        })
    }

    async fn attach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<DomainAttachment> {
        let attached = expect_json(
            self.platform(),
            self.request(
                reqwest::Method::POST,
                &format!("/v10/projects/{external_id}/domains"),
                credentials,
            )
            .json(&json!({ "name": domain })),
        )
        .await?;

        let verified = attached
            .pointer("/verified")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let dns_records = if verified {
            Vec::new()
        } else {
            self.dns_instructions(credentials, external_id, domain)
                .await?
        };
        Ok(DomainAttachment {
            configured: true,
            verified,
            dns_records,
        })
    }

    async fn dns_instructions(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
        domain: &str,
    ) -> ProviderResult<Vec<DnsRecord>> {
        Ok(vec![DnsRecord::new(
            "CNAME",
            domain,
            "cname.vercel-dns.com",
        )])
    }

    async fn detach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<bool> {
        expect_success_or_missing(
            self.platform(),
            self.request(
                reqwest::Method::DELETE,
                &format!("/v9/projects/{external_id}/domains/{domain}"),
                credentials,
            ),
        )
        .await
    }
}

//! Cloudflare Pages provider adapter.
//!
//! Cloudflare scopes everything under an account: the stored credential must
//! carry an account identifier, and the project name doubles as the external
//! project identifier. The v4 API wraps every response in a
//! `{success, errors, result}` envelope.

use super::http::{expect_json, optional_str, parse_timestamp, require_str};
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

const API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Provider adapter for Cloudflare Pages.
#[derive(Debug, Clone)]
pub struct CloudflarePagesProvider {
    client: Client,
}

impl CloudflarePagesProvider {
    /// Creates the adapter with a shared HTTP client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    fn account_id<'a>(&self, credentials: &'a ProviderCredentials) -> ProviderResult<&'a str> {
        credentials.account_id().ok_or_else(|| {
            ProviderError::api(
                Platform::CloudflarePages,
                "an account id is required for Cloudflare Pages",
            )
        })
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

    /// Sends a request and unwraps the v4 `{success, errors, result}`
    /// envelope.
    async fn call(
        &self,
        method: reqwest::Method,
        path: &str,
        credentials: &ProviderCredentials,
        body: Option<Value>,
    ) -> ProviderResult<Value> {
        let mut request = self.request(method, path, credentials);
        if let Some(payload) = body {
            request = request.json(&payload);
        }
        let envelope = expect_json(self.platform(), request).await?;

        let success = envelope
            .pointer("/success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !success {
            let message = optional_str(&envelope, "/errors/0/message")
                .unwrap_or_else(|| "request was not successful".to_owned());
            return Err(ProviderError::api(self.platform(), message));
        }
        Ok(envelope.pointer("/result").cloned().unwrap_or(Value::Null))
    }

    fn snapshot_from_project(platform: Platform, project: &Value) -> ProviderResult<ProjectSnapshot> {
        let name = require_str(platform, project, "/name")?;
        let production_url = optional_str(project, "/subdomain")
            .map(|subdomain| format!("https://{subdomain}"))
            .or_else(|| optional_str(project, "/canonical_deployment/url"));
        let custom_domains = project
            .pointer("/domains")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_owned))
                    // The default pages.dev hostname is listed among domains;
                    // only user-attached ones count.
                    .filter(|domain| !domain.ends_with(".pages.dev"))
                    .collect()
            })
            .unwrap_or_default();

        Ok(ProjectSnapshot {
            external_id: name.clone(),
            name,
            production_url,
            custom_domains,
        })
    }
}

fn map_stage(stage_name: &str, stage_status: &str) -> DeploymentStatus {
    match stage_status {
        "success" if stage_name == "deploy" => DeploymentStatus::Success,
        "failure" | "failed" => DeploymentStatus::Failed,
        "canceled" => DeploymentStatus::Cancelled,
        "active" => DeploymentStatus::Building,
        "success" => DeploymentStatus::Building,
        _ => DeploymentStatus::Pending,
    }
}

#[async_trait]
impl HostingProvider for CloudflarePagesProvider {
    fn platform(&self) -> Platform {
        Platform::CloudflarePages
    }

    async fn verify_credentials(&self, credentials: &ProviderCredentials) -> ProviderResult<()> {
        self.call(
            reqwest::Method::GET,
            "/user/tokens/verify",
            credentials,
            None,
        )
        .await
        .map(|_| ())
    }

    async fn create_project(
        &self,
        credentials: &ProviderCredentials,
        config: &ProjectConfig,
    ) -> ProviderResult<ProjectSnapshot> {
        let account = self.account_id(credentials)?;
        let body = json!({
            "name": config.name(),
            "production_branch": config.production_branch(),
            "source": {
                "type": "github",
                "config": {
                    "owner": config.repo_owner(),
                    "repo_name": config.repo_name(),
                    "production_branch": config.production_branch(),
                },
            },
        });
        let project = self
            .call(
                reqwest::Method::POST,
                &format!("/accounts/{account}/pages/projects"),
                credentials,
                Some(body),
            )
            .await?;
        Self::snapshot_from_project(self.platform(), &project)
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
        let account = self.account_id(credentials)?;
        let deployment = self
            .call(
                reqwest::Method::POST,
                &format!("/accounts/{account}/pages/projects/{external_id}/deployments"),
                credentials,
                Some(json!({ "branch": request.branch() })),
            )
            .await?;

        let url = optional_str(&deployment, "/url");
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
        let account = self.account_id(credentials)?;
        let project = self
            .call(
                reqwest::Method::GET,
                &format!("/accounts/{account}/pages/projects/{external_id}"),
                credentials,
                None,
            )
            .await?;
        Self::snapshot_from_project(self.platform(), &project)
    }

    async fn delete_project(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
    ) -> ProviderResult<()> {
        let account = self.account_id(credentials)?;
        self.call(
            reqwest::Method::DELETE,
            &format!("/accounts/{account}/pages/projects/{external_id}"),
            credentials,
            None,
        )
        .await
        .map(|_| ())
    }

    async fn deployment_status(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        deployment_id: &str,
    ) -> ProviderResult<StatusReport> {
        let account = self.account_id(credentials)?;
        let deployment = self
            .call(
                reqwest::Method::GET,
                &format!(
                    "/accounts/{account}/pages/projects/{external_id}/deployments/{deployment_id}"
                ),
                credentials,
                None,
            )
            .await?;

        let stage_name = optional_str(&deployment, "/latest_stage/name").unwrap_or_default();
        let stage_status = optional_str(&deployment, "/latest_stage/status").unwrap_or_default();
        let environment = optional_str(&deployment, "/environment");
        let url = optional_str(&deployment, "/url");

        Ok(StatusReport {
            status: map_stage(&stage_name, &stage_status),
            preview_url: if environment.as_deref() == Some("production") {
                None
            } else {
                url.clone()
            },
            deployment_url: url,
            created_at: parse_timestamp(&deployment, "/created_on"),
            completed_at: parse_timestamp(&deployment, "/latest_stage/ended_on"),
            error: optional_str(&deployment, "/latest_stage/message"),
        })
    }

    async fn deployment_logs(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        deployment_id: &str,
        _cursor: Option<&str>,
    ) -> ProviderResult<LogPage> {
        let account = self.account_id(credentials)?;
        let logs = self
            .call(
                reqwest::Method::GET,
                &format!(
                    "/accounts/{account}/pages/projects/{external_id}/deployments/{deployment_id}/history/logs"
                ),
                credentials,
                None,
            )
            .await?;

        let entries = logs
            .pointer("/data")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| LogEntry {
                        timestamp: parse_timestamp(item, "/ts"),
                        level: None,
                        message: optional_str(item, "/line").unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        // The log endpoint returns the full history in one response.
        Ok(LogPage {
            entries,
            has_more: false,
            next_cursor: None,
        })
    }

    async fn attach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<DomainAttachment> {
        let account = self.account_id(credentials)?;
        let attached = self
            .call(
                reqwest::Method::POST,
                &format!("/accounts/{account}/pages/projects/{external_id}/domains"),
                credentials,
                Some(json!({ "name": domain })),
            )
            .await?;

        let verified = optional_str(&attached, "/status").is_some_and(|status| status == "active");
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
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<Vec<DnsRecord>> {
        Ok(vec![DnsRecord::new(
            "CNAME",
            domain,
            format!("{external_id}.pages.dev"),
        )])
    }

    async fn detach_domain(
        &self,
        credentials: &ProviderCredentials,
        external_id: &str,
        domain: &str,
    ) -> ProviderResult<bool> {
        let account = self.account_id(credentials)?;
        let result = self
            .call(
                reqwest::Method::DELETE,
                &format!("/accounts/{account}/pages/projects/{external_id}/domains/{domain}"),
                credentials,
                None,
            )
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(ProviderError::Api { ref message, .. }) if message.starts_with("HTTP 404") => {
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}

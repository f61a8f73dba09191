//! Shared harness for in-memory integration tests.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use halyard::api::{AppState, RateLimiter, StaticTokenAuthenticator, router};
use halyard::config::PlatformSettings;
use halyard::credential::adapters::InMemoryCredentialRepository;
use halyard::credential::domain::UserId;
use halyard::credential::ports::PlaintextTokenCipher;
use halyard::credential::services::CredentialService;
use halyard::deployment::adapters::InMemoryDeploymentHistoryRepository;
use halyard::deployment::domain::DeploymentStatus;
use halyard::deployment::ports::DeploymentHistoryRepository;
use halyard::hosting::domain::{
    AutoSetup, DeployOutcome, DeployRequest, DnsRecord, DomainAttachment, LogEntry, LogPage,
    Platform, ProjectConfig, ProjectSnapshot, ProviderCredentials, StatusReport,
};
use halyard::hosting::error::{ProviderError, ProviderResult};
use halyard::hosting::ports::HostingProvider;
use halyard::hosting::registry::ProviderRegistry;
use halyard::oauth::adapters::InMemoryStateRepository;
use halyard::oauth::services::{ConnectFlowService, StateGuardService};
use halyard::project::adapters::{InMemoryProjectRepository, InMemoryRepositoryDirectory};
use halyard::project::domain::{RepositoryId, SourceRepository};
use halyard::project::services::{ProjectActivityProbe, ProjectRegistryService};
use halyard::webhook::services::WebhookIngestor;
use mockable::DefaultClock;
use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;
use url::Url;

/// Webhook signing secret configured for every platform in tests.
pub const WEBHOOK_SECRET: &str = "whsec_integration";

/// Bearer token mapped to the harness owner.
pub const SESSION_TOKEN: &str = "session-token";

/// Bearer token mapped to a second, unrelated user.
pub const INTRUDER_TOKEN: &str = "intruder-token";

/// Scripted in-memory provider implementing the public port.
pub struct ScriptedProvider {
    platform: Platform,
    deploys: AtomicUsize,
    exchanged_codes: Mutex<Vec<String>>,
    status_report: Mutex<Option<StatusReport>>,
}

impl ScriptedProvider {
    /// Creates a provider where every operation succeeds.
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            deploys: AtomicUsize::new(0),
            exchanged_codes: Mutex::new(Vec::new()),
            status_report: Mutex::new(None),
        }
    }

    /// Returns the codes passed to `exchange_code` so far.
    pub fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged_codes
            .lock()
            .map(|codes| codes.clone())
            .unwrap_or_default()
    }

    /// Sets the report returned by `deployment_status`.
    pub fn set_status_report(&self, report: StatusReport) {
        if let Ok(mut slot) = self.status_report.lock() {
            *slot = Some(report);
        }
    }

    fn snapshot(name: &str) -> ProjectSnapshot {
        ProjectSnapshot {
            external_id: format!("ext-{name}"),
            name: name.to_owned(),
            production_url: Some(format!("https://{name}.scripted.app")),
            custom_domains: Vec::new(),
        }
    }
}

#[async_trait]
impl HostingProvider for ScriptedProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn authorization_url(&self, redirect_uri: &str, state: &str) -> ProviderResult<Url> {
        Url::parse(&format!(
            "https://auth.scripted.app/authorize?redirect_uri={redirect_uri}&state={state}"
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
        Ok(Self::snapshot(config.name()))
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
        let sequence = self.deploys.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(DeployOutcome {
            external_deployment_id: format!("dep-{sequence}"),
            deployment_url: Some(format!("https://{external_id}.scripted.app")),
            preview_url: None,
        })
    }

    async fn project_snapshot(
        &self,
        _credentials: &ProviderCredentials,
        external_id: &str,
    ) -> ProviderResult<ProjectSnapshot> {
        Ok(Self::snapshot(external_id))
    }

    async fn delete_project(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
    ) -> ProviderResult<()> {
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
        Ok(DomainAttachment {
            configured: true,
            verified: false,
            dns_records: vec![DnsRecord::new("CNAME", domain, "target.scripted.app")],
        })
    }

    async fn dns_instructions(
        &self,
        _credentials: &ProviderCredentials,
        _external_id: &str,
        domain: &str,
    ) -> ProviderResult<Vec<DnsRecord>> {
        Ok(vec![DnsRecord::new("CNAME", domain, "target.scripted.app")])
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

/// Fully wired application over in-memory adapters and scripted providers.
pub struct TestApp {
    pub state: Arc<AppState>,
    pub owner: UserId,
    pub repository: RepositoryId,
    pub credentials: CredentialService,
    pub projects: ProjectRegistryService,
    pub histories: Arc<InMemoryDeploymentHistoryRepository>,
    pub vercel: Arc<ScriptedProvider>,
}

impl TestApp {
    /// Builds the application with working in-memory persistence.
    #[must_use]
    pub fn new() -> Self {
        let histories = Arc::new(InMemoryDeploymentHistoryRepository::new());
        Self::build(histories.clone(), histories)
    }

    /// Builds the application around a custom history repository.
    ///
    /// The inspectable `histories` field stays empty in this mode; it exists
    /// so the default harness can assert on stored rows.
    #[must_use]
    pub fn with_history_repository(histories_port: Arc<dyn DeploymentHistoryRepository>) -> Self {
        Self::build(Arc::new(InMemoryDeploymentHistoryRepository::new()), histories_port)
    }

    fn build(
        histories: Arc<InMemoryDeploymentHistoryRepository>,
        histories_port: Arc<dyn DeploymentHistoryRepository>,
    ) -> Self {
        let project_repo = Arc::new(InMemoryProjectRepository::new());
        let directory = Arc::new(InMemoryRepositoryDirectory::new());
        let clock = Arc::new(DefaultClock);

        let owner = UserId::new();
        let repository = RepositoryId::new();
        directory
            .insert(SourceRepository::new(repository, owner, "alice", "blog"))
            .expect("directory insert should succeed");
        let intruder = UserId::new();
        directory
            .insert(SourceRepository::new(
                RepositoryId::new(),
                intruder,
                "mallory",
                "zine",
            ))
            .expect("directory insert should succeed");

        let vercel = Arc::new(ScriptedProvider::new(Platform::Vercel));
        let providers = ProviderRegistry::new([
            vercel.clone() as Arc<dyn HostingProvider>,
            Arc::new(ScriptedProvider::new(Platform::GithubPages)),
            Arc::new(ScriptedProvider::new(Platform::Netlify)),
            Arc::new(ScriptedProvider::new(Platform::CloudflarePages)),
        ]);

        let mut settings = PlatformSettings::new("https://app.example.com");
        for platform in halyard::hosting::domain::ALL_PLATFORMS {
            settings = settings.with_webhook_secret(platform, WEBHOOK_SECRET);
        }

        let probe = Arc::new(ProjectActivityProbe::new(
            project_repo.clone(),
            directory.clone(),
        ));
        let credentials = CredentialService::new(
            Arc::new(InMemoryCredentialRepository::new()),
            probe,
            Arc::new(PlaintextTokenCipher),
            clock.clone(),
        );
        let guard = StateGuardService::new(Arc::new(InMemoryStateRepository::new()), clock.clone());
        let connect_flow = ConnectFlowService::new(
            providers.clone(),
            guard,
            credentials.clone(),
            settings.clone(),
        );
        let projects = ProjectRegistryService::new(
            project_repo.clone(),
            directory.clone(),
            histories_port.clone(),
            credentials.clone(),
            providers.clone(),
            clock.clone(),
        );
        let deployments = halyard::deployment::services::DeploymentService::new(
            histories_port.clone(),
            project_repo.clone(),
            directory.clone(),
            credentials.clone(),
            providers.clone(),
            clock.clone(),
        );
        let ingestor = WebhookIngestor::new(
            settings.clone(),
            project_repo,
            histories_port,
            clock.clone(),
        );

        let authenticator = StaticTokenAuthenticator::new();
        authenticator.insert(SESSION_TOKEN, owner);
        authenticator.insert(INTRUDER_TOKEN, intruder);

        let state = Arc::new(AppState::new(
            settings,
            providers,
            credentials.clone(),
            connect_flow,
            projects.clone(),
            deployments,
            ingestor,
            Arc::new(authenticator),
            RateLimiter::with_defaults(clock),
        ));

        Self {
            state,
            owner,
            repository,
            credentials,
            projects,
            histories,
            vercel,
        }
    }

    /// Returns a fresh router over the shared state.
    #[must_use]
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends one request through the router and decodes the JSON response.
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };

    let response = app
        .router()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

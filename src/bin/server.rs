//! Halyard HTTP server.
//!
//! Wires configuration, `PostgreSQL` persistence, the provider registry and
//! every context service once at startup, then serves the API router. All
//! dependencies are constructed here and injected explicitly; nothing is
//! lazily initialized inside handlers.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use halyard::api::{AppState, RateLimiter, StaticTokenAuthenticator, router};
use halyard::config::PlatformSettings;
use halyard::credential::adapters::PostgresCredentialRepository;
use halyard::credential::ports::PlaintextTokenCipher;
use halyard::credential::services::CredentialService;
use halyard::deployment::adapters::PostgresDeploymentHistoryRepository;
use halyard::deployment::services::DeploymentService;
use halyard::hosting::registry::ProviderRegistry;
use halyard::oauth::adapters::PostgresStateRepository;
use halyard::oauth::services::{ConnectFlowService, StateGuardService};
use halyard::project::adapters::{PostgresProjectRepository, PostgresRepositoryDirectory};
use halyard::project::services::{ProjectActivityProbe, ProjectRegistryService};
use halyard::webhook::services::WebhookIngestor;
use mockable::DefaultClock;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = PlatformSettings::from_env()?;
    let database_url = std::env::var("DATABASE_URL")?;
    let pool: Pool<ConnectionManager<PgConnection>> =
        Pool::builder().build(ConnectionManager::new(database_url))?;

    let clock = Arc::new(DefaultClock);
    let providers = ProviderRegistry::with_default_providers(&settings);

    let credential_repo = Arc::new(PostgresCredentialRepository::new(pool.clone()));
    let state_repo = Arc::new(PostgresStateRepository::new(pool.clone()));
    let project_repo = Arc::new(PostgresProjectRepository::new(pool.clone()));
    let directory = Arc::new(PostgresRepositoryDirectory::new(pool.clone()));
    let history_repo = Arc::new(PostgresDeploymentHistoryRepository::new(pool));

    let probe = Arc::new(ProjectActivityProbe::new(
        project_repo.clone(),
        directory.clone(),
    ));
    let credentials = CredentialService::new(
        credential_repo,
        probe,
        Arc::new(PlaintextTokenCipher),
        clock.clone(),
    );
    let guard = StateGuardService::new(state_repo, clock.clone());
    let connect_flow = ConnectFlowService::new(
        providers.clone(),
        guard,
        credentials.clone(),
        settings.clone(),
    );
    let projects = ProjectRegistryService::new(
        project_repo.clone(),
        directory.clone(),
        history_repo.clone(),
        credentials.clone(),
        providers.clone(),
        clock.clone(),
    );
    let deployments = DeploymentService::new(
        history_repo.clone(),
        project_repo.clone(),
        directory,
        credentials.clone(),
        providers.clone(),
        clock.clone(),
    );
    let ingestor = WebhookIngestor::new(
        settings.clone(),
        project_repo,
        history_repo,
        clock.clone(),
    );

    let state = Arc::new(AppState::new(
        settings,
        providers,
        credentials,
        connect_flow,
        projects,
        deployments,
        ingestor,
        Arc::new(StaticTokenAuthenticator::new()),
        RateLimiter::with_defaults(clock),
    ));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(8080);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "halyard server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

//! Unit tests for the webhook ingestor.

use crate::config::PlatformSettings;
use crate::deployment::adapters::InMemoryDeploymentHistoryRepository;
use crate::deployment::domain::{DeploymentStatus, TriggerSource};
use crate::deployment::ports::DeploymentHistoryRepository;
use crate::hosting::domain::{Platform, ProjectSnapshot};
use crate::project::adapters::InMemoryProjectRepository;
use crate::project::domain::{DeploymentProject, ProjectId, RepositoryId};
use crate::project::ports::ProjectRepository;
use crate::webhook::services::{IngestError, IngestOutcome, WebhookIngestor};
use crate::webhook::signature::sign_body;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

const SECRET: &str = "whsec_test";

struct Harness {
    ingestor: WebhookIngestor,
    projects: Arc<InMemoryProjectRepository>,
    histories: Arc<InMemoryDeploymentHistoryRepository>,
    project_id: ProjectId,
}

async fn harness() -> Harness {
    let projects = Arc::new(InMemoryProjectRepository::new());
    let histories = Arc::new(InMemoryDeploymentHistoryRepository::new());
    let clock = Arc::new(DefaultClock);

    let project = DeploymentProject::from_snapshot(
        RepositoryId::new(),
        Platform::Vercel,
        ProjectSnapshot {
            external_id: "prj_1".to_owned(),
            name: "blog".to_owned(),
            production_url: Some("https://blog.vercel.app".to_owned()),
            custom_domains: Vec::new(),
        },
        &*clock,
    );
    projects
        .upsert(&project)
        .await
        .expect("project upsert should succeed");

    let settings = PlatformSettings::new("https://app.example.com")
        .with_webhook_secret(Platform::Vercel, SECRET);
    let ingestor = WebhookIngestor::new(settings, projects.clone(), histories.clone(), clock);

    Harness {
        ingestor,
        projects,
        histories,
        project_id: project.id(),
    }
}

fn signed(body: &[u8]) -> String {
    sign_body(Platform::Vercel, SECRET, body)
}

fn created_body() -> Vec<u8> {
    json!({
        "type": "deployment.created",
        "payload": {
            "project": { "id": "prj_1" },
            "deployment": { "id": "dpl_1", "url": "blog-abc.vercel.app" }
        }
    })
    .to_string()
    .into_bytes()
}

fn succeeded_body() -> Vec<u8> {
    json!({
        "type": "deployment.succeeded",
        "payload": {
            "project": { "id": "prj_1" },
            "deployment": { "id": "dpl_1", "url": "blog-abc.vercel.app" }
        }
    })
    .to_string()
    .into_bytes()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_signature_mutates_nothing() {
    let fixture = harness().await;
    let body = created_body();

    let result = fixture
        .ingestor
        .ingest(Platform::Vercel, Some("deadbeef"), &body)
        .await;

    assert!(matches!(result, Err(IngestError::Signature(_))));
    let rows = fixture
        .histories
        .list_for_project(fixture.project_id)
        .await
        .expect("listing should succeed");
    assert!(rows.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unconfigured_platform_is_rejected() {
    let fixture = harness().await;
    let result = fixture
        .ingestor
        .ingest(Platform::Netlify, Some("deadbeef"), b"{}")
        .await;
    assert!(matches!(result, Err(IngestError::NoSecret(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_event_appends_a_webhook_triggered_row() {
    let fixture = harness().await;
    let body = created_body();
    let signature = signed(&body);

    let outcome = fixture
        .ingestor
        .ingest(Platform::Vercel, Some(&signature), &body)
        .await
        .expect("ingest should succeed");
    assert_eq!(outcome, IngestOutcome::Applied);

    let row = fixture
        .histories
        .find_by_external_id(fixture.project_id, "dpl_1")
        .await
        .expect("lookup should succeed")
        .expect("row should exist");
    assert_eq!(row.triggered_by(), TriggerSource::Webhook);
    assert_eq!(row.status(), DeploymentStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replaying_a_delivery_converges_to_the_same_state() {
    let fixture = harness().await;
    let create = created_body();
    let create_sig = signed(&create);
    let succeed = succeeded_body();
    let succeed_sig = signed(&succeed);

    for _ in 0..2 {
        fixture
            .ingestor
            .ingest(Platform::Vercel, Some(&create_sig), &create)
            .await
            .expect("ingest should succeed");
    }
    for _ in 0..2 {
        fixture
            .ingestor
            .ingest(Platform::Vercel, Some(&succeed_sig), &succeed)
            .await
            .expect("ingest should succeed");
    }

    let rows = fixture
        .histories
        .list_for_project(fixture.project_id)
        .await
        .expect("listing should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows.first().expect("one row").status(),
        DeploymentStatus::Success
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_building_event_after_success_is_ignored() {
    let fixture = harness().await;
    let create = created_body();
    let succeed = succeeded_body();
    fixture
        .ingestor
        .ingest(Platform::Vercel, Some(&signed(&create)), &create)
        .await
        .expect("ingest should succeed");
    fixture
        .ingestor
        .ingest(Platform::Vercel, Some(&signed(&succeed)), &succeed)
        .await
        .expect("ingest should succeed");

    let stale = json!({
        "type": "deployment.created",
        "payload": {
            "project": { "id": "prj_1" },
            "deployment": { "id": "dpl_1" }
        }
    })
    .to_string()
    .into_bytes();
    fixture
        .ingestor
        .ingest(Platform::Vercel, Some(&signed(&stale)), &stale)
        .await
        .expect("ingest should succeed");

    let row = fixture
        .histories
        .find_by_external_id(fixture.project_id, "dpl_1")
        .await
        .expect("lookup should succeed")
        .expect("row should exist");
    assert_eq!(row.status(), DeploymentStatus::Success);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_deployment_is_logged_and_ignored() {
    let fixture = harness().await;
    let body = json!({
        "type": "deployment.succeeded",
        "payload": {
            "project": { "id": "prj_1" },
            "deployment": { "id": "dpl_unknown" }
        }
    })
    .to_string()
    .into_bytes();
    let signature = signed(&body);

    let outcome = fixture
        .ingestor
        .ingest(Platform::Vercel, Some(&signature), &body)
        .await
        .expect("ingest should succeed");

    assert_eq!(outcome, IngestOutcome::Ignored);
    let rows = fixture
        .histories
        .list_for_project(fixture.project_id)
        .await
        .expect("listing should succeed");
    assert!(rows.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_project_is_logged_and_ignored() {
    let fixture = harness().await;
    let body = json!({
        "type": "deployment.created",
        "payload": {
            "project": { "id": "prj_unregistered" },
            "deployment": { "id": "dpl_2" }
        }
    })
    .to_string()
    .into_bytes();
    let signature = signed(&body);

    let outcome = fixture
        .ingestor
        .ingest(Platform::Vercel, Some(&signature), &body)
        .await
        .expect("ingest should succeed");
    assert_eq!(outcome, IngestOutcome::Ignored);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_removal_deactivates_the_local_record() {
    let fixture = harness().await;
    let body = json!({
        "type": "project.removed",
        "payload": { "project": { "id": "prj_1" } }
    })
    .to_string()
    .into_bytes();
    let signature = signed(&body);

    let outcome = fixture
        .ingestor
        .ingest(Platform::Vercel, Some(&signature), &body)
        .await
        .expect("ingest should succeed");
    assert_eq!(outcome, IngestOutcome::Applied);

    let project = fixture
        .projects
        .find_by_id(fixture.project_id)
        .await
        .expect("lookup should succeed")
        .expect("project should exist");
    assert!(!project.is_active());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authentic_garbage_is_acknowledged_but_ignored() {
    let fixture = harness().await;
    let body = b"not json at all";
    let signature = signed(body);

    let outcome = fixture
        .ingestor
        .ingest(Platform::Vercel, Some(&signature), body)
        .await
        .expect("ingest should succeed");
    assert_eq!(outcome, IngestOutcome::Ignored);
}

//! End-to-end wire scenarios through the HTTP router.

use super::helpers::{
    INTRUDER_TOKEN, SESSION_TOKEN, TestApp, WEBHOOK_SECRET, send,
};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use halyard::deployment::domain::{DeploymentHistory, DeploymentId};
use halyard::deployment::ports::{
    DeploymentHistoryError, DeploymentHistoryRepository, DeploymentHistoryResult,
};
use halyard::hosting::domain::Platform;
use halyard::project::domain::ProjectId;
use halyard::webhook::signature::sign_body;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;

async fn create_vercel_project(app: &TestApp) -> (String, Value) {
    let (status, _) = send(
        app,
        "POST",
        "/platforms",
        Some(SESSION_TOKEN),
        Some(json!({ "platform": "vercel", "accessToken": "tok_abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, project) = send(
        app,
        "POST",
        "/projects",
        Some(SESSION_TOKEN),
        Some(json!({
            "repositoryId": app.repository.into_inner(),
            "platform": "vercel",
            "name": "blog",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = project["project"]["id"]
        .as_str()
        .expect("project id should be present")
        .to_owned();
    (id, project)
}

#[tokio::test(flavor = "multi_thread")]
async fn connect_then_create_returns_project_with_production_url() {
    let app = TestApp::new();
    let (status, _) = send(
        &app,
        "POST",
        "/platforms",
        Some(SESSION_TOKEN),
        Some(json!({ "platform": "vercel", "accessToken": "tok_abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, listing) = send(&app, "GET", "/platforms", Some(SESSION_TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    let vercel = listing["platforms"]
        .as_array()
        .expect("platform list")
        .iter()
        .find(|entry| entry["platform"] == "vercel")
        .expect("vercel should be listed")
        .clone();
    assert_eq!(vercel["connected"], json!(true));
    assert_eq!(vercel["teamId"], Value::Null);
    assert_eq!(vercel["accountId"], Value::Null);

    let (_, created) = create_vercel_project(&app).await;
    let production_url = created["project"]["productionUrl"]
        .as_str()
        .expect("production url should be present");
    assert!(production_url.contains("blog"));
}

#[tokio::test(flavor = "multi_thread")]
async fn domain_cap_conflict_leaves_the_stored_list_unchanged() {
    let app = TestApp::new();
    let (status, _) = send(
        &app,
        "POST",
        "/platforms",
        Some(SESSION_TOKEN),
        Some(json!({ "platform": "github-pages", "accessToken": "ghs_tok" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, project) = send(
        &app,
        "POST",
        "/projects",
        Some(SESSION_TOKEN),
        Some(json!({
            "repositoryId": app.repository.into_inner(),
            "platform": "github-pages",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let project_id = project["project"]["id"].as_str().expect("id").to_owned();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/projects/{project_id}/domains"),
        Some(SESSION_TOKEN),
        Some(json!({ "domain": "blog.example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/projects/{project_id}/domains"),
        Some(SESSION_TOKEN),
        Some(json!({ "domain": "www.example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("conflict"));

    let (_, domains) = send(
        &app,
        "GET",
        &format!("/projects/{project_id}/domains"),
        Some(SESSION_TOKEN),
        None,
    )
    .await;
    assert_eq!(domains["domains"], json!(["blog.example.com"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_oauth_state_redirects_without_exchanging_the_code() {
    let app = TestApp::new();

    let request = Request::builder()
        .method("GET")
        .uri("/oauth/vercel/callback?code=code_1&state=xyz")
        .header(header::AUTHORIZATION, format!("Bearer {SESSION_TOKEN}"))
        .body(Body::empty())
        .expect("request should build");
    let response = app
        .router()
        .oneshot(request)
        .await
        .expect("router should respond");

    assert!(response.status().is_redirection());
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location");
    assert!(location.contains("error=Invalid%20state%20parameter"));
    assert!(app.vercel.exchanged_codes().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn webhook_for_unknown_deployment_acknowledges_without_mutation() {
    let app = TestApp::new();
    let (project_id, _) = create_vercel_project(&app).await;

    let body = json!({
        "type": "deployment.succeeded",
        "payload": {
            "project": { "id": "ext-blog" },
            "deployment": { "id": "dpl_unknown" }
        }
    })
    .to_string();
    let signature = sign_body(Platform::Vercel, WEBHOOK_SECRET, body.as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/webhook/vercel")
        .header("x-vercel-signature", signature)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request should build");
    let response = app
        .router()
        .oneshot(request)
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let ack: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(ack, json!({ "received": true }));

    let rows = app
        .histories
        .find_by_external_id(
            ProjectId::from_uuid(project_id.parse().expect("uuid")),
            "dpl_unknown",
        )
        .await
        .expect("lookup should succeed");
    assert!(rows.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn unsigned_webhook_is_rejected() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/webhook/vercel")
        .body(Body::from("{}"))
        .expect("request should build");
    let response = app
        .router()
        .oneshot(request)
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// History repository whose writes always fail, simulating a store outage.
#[derive(Debug, Default)]
struct FailingHistoryRepository;

fn outage<T>() -> DeploymentHistoryResult<T> {
    Err(DeploymentHistoryError::persistence(std::io::Error::other(
        "store outage",
    )))
}

#[async_trait::async_trait]
impl DeploymentHistoryRepository for FailingHistoryRepository {
    async fn insert(&self, _history: &DeploymentHistory) -> DeploymentHistoryResult<()> {
        outage()
    }

    async fn update(&self, _history: &DeploymentHistory) -> DeploymentHistoryResult<()> {
        outage()
    }

    async fn find_by_id(
        &self,
        _id: DeploymentId,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>> {
        outage()
    }

    async fn find_by_external_id(
        &self,
        _project_id: ProjectId,
        _external_deployment_id: &str,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>> {
        outage()
    }

    async fn find_latest_for_project(
        &self,
        _project_id: ProjectId,
    ) -> DeploymentHistoryResult<Option<DeploymentHistory>> {
        outage()
    }

    async fn list_for_project(
        &self,
        _project_id: ProjectId,
    ) -> DeploymentHistoryResult<Vec<DeploymentHistory>> {
        outage()
    }

    async fn delete_for_project(&self, _project_id: ProjectId) -> DeploymentHistoryResult<usize> {
        outage()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn deploy_still_succeeds_when_history_writes_fail() {
    let app = TestApp::with_history_repository(Arc::new(FailingHistoryRepository));
    let (project_id, _) = create_vercel_project(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/projects/{project_id}/deploy"),
        Some(SESSION_TOKEN),
        Some(json!({ "branch": "main" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(body["deploymentId"].as_str().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn requests_without_a_session_are_unauthorized() {
    let app = TestApp::new();
    let (status, body) = send(&app, "GET", "/projects", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("unauthorized"));
}

#[tokio::test(flavor = "multi_thread")]
async fn foreign_sessions_cannot_touch_the_project() {
    let app = TestApp::new();
    let (project_id, _) = create_vercel_project(&app).await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/projects/{project_id}"),
        Some(INTRUDER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/projects/{project_id}/deploy"),
        Some(INTRUDER_TOKEN),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/projects/{project_id}"),
        Some(INTRUDER_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread")]
async fn deploy_rate_limit_caps_a_single_client() {
    let app = TestApp::new();
    let (project_id, _) = create_vercel_project(&app).await;

    for _ in 0..10 {
        let (status, _) = send(
            &app,
            "POST",
            &format!("/projects/{project_id}/deploy"),
            Some(SESSION_TOKEN),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(
        &app,
        "POST",
        &format!("/projects/{project_id}/deploy"),
        Some(SESSION_TOKEN),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], json!("rate_limited"));
}

#[tokio::test(flavor = "multi_thread")]
async fn status_endpoint_reports_the_latest_deployment() {
    let app = TestApp::new();
    let (project_id, _) = create_vercel_project(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/projects/{project_id}/deploy"),
        Some(SESSION_TOKEN),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/projects/{project_id}/status"),
        Some(SESSION_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("building"));

    // Completion reported by the platform shows up on the next poll, and a
    // later stale building report does not reopen it.
    app.vercel.set_status_report(halyard::hosting::domain::StatusReport {
        status: halyard::deployment::domain::DeploymentStatus::Success,
        deployment_url: Some("https://ext-blog.scripted.app".to_owned()),
        preview_url: None,
        created_at: None,
        completed_at: None,
        error: None,
    });
    let (_, done) = send(
        &app,
        "GET",
        &format!("/projects/{project_id}/status"),
        Some(SESSION_TOKEN),
        None,
    )
    .await;
    assert_eq!(done["status"], json!("success"));

    app.vercel.set_status_report(halyard::hosting::domain::StatusReport {
        status: halyard::deployment::domain::DeploymentStatus::Building,
        deployment_url: None,
        preview_url: None,
        created_at: None,
        completed_at: None,
        error: None,
    });
    let (_, stale) = send(
        &app,
        "GET",
        &format!("/projects/{project_id}/status"),
        Some(SESSION_TOKEN),
        None,
    )
    .await;
    assert_eq!(stale["status"], json!("success"));
}

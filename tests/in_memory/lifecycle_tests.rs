//! Cross-service flows over the public API.

use super::helpers::{TestApp, WEBHOOK_SECRET};
use halyard::credential::services::{ConnectPlatformRequest, CredentialServiceError};
use halyard::deployment::domain::DeploymentStatus;
use halyard::deployment::ports::DeploymentHistoryRepository;
use halyard::hosting::domain::Platform;
use halyard::project::services::CreateProjectRequest;
use halyard::webhook::signature::sign_body;
use serde_json::json;

#[tokio::test(flavor = "multi_thread")]
async fn disconnect_is_blocked_until_the_last_project_is_deleted() {
    let app = TestApp::new();
    app.credentials
        .connect(
            app.owner,
            ConnectPlatformRequest::new(Platform::Vercel, "tok_abc"),
        )
        .await
        .expect("connect should succeed");
    let registered = app
        .projects
        .create(app.owner, CreateProjectRequest::new(app.repository, Platform::Vercel))
        .await
        .expect("create should succeed");

    let blocked = app
        .credentials
        .disconnect(app.owner, Platform::Vercel)
        .await;
    assert!(matches!(
        blocked,
        Err(CredentialServiceError::ActiveProjectsExist { .. })
    ));

    app.projects
        .delete(app.owner, registered.project.id())
        .await
        .expect("delete should succeed");
    app.credentials
        .disconnect(app.owner, Platform::Vercel)
        .await
        .expect("disconnect should succeed once the project is gone");
}

#[tokio::test(flavor = "multi_thread")]
async fn webhook_completion_wins_over_a_stale_poll() {
    let app = TestApp::new();
    app.credentials
        .connect(
            app.owner,
            ConnectPlatformRequest::new(Platform::Vercel, "tok_abc"),
        )
        .await
        .expect("connect should succeed");
    let registered = app
        .projects
        .create(app.owner, CreateProjectRequest::new(app.repository, Platform::Vercel))
        .await
        .expect("create should succeed");
    let project = registered.project;
    let deployment_id = registered
        .first_deployment
        .expect("auto setup should deploy")
        .external_deployment_id;

    // The platform pushes completion before the next poll happens.
    let body = json!({
        "type": "deployment.created",
        "payload": {
            "project": { "id": project.external_project_id() },
            "deployment": { "id": deployment_id }
        }
    })
    .to_string();
    let signature = sign_body(Platform::Vercel, WEBHOOK_SECRET, body.as_bytes());
    assert!(test_ingest(&app, &body, &signature).await);

    let success = json!({
        "type": "deployment.succeeded",
        "payload": {
            "project": { "id": project.external_project_id() },
            "deployment": { "id": deployment_id }
        }
    })
    .to_string();
    let success_sig = sign_body(Platform::Vercel, WEBHOOK_SECRET, success.as_bytes());
    assert!(test_ingest(&app, &success, &success_sig).await);

    // Replaying the stale created event afterwards must not reopen the row.
    assert!(test_ingest(&app, &body, &signature).await);
    let row = app
        .histories
        .find_by_external_id(project.id(), &deployment_id)
        .await
        .expect("lookup should succeed")
        .expect("row should exist");
    assert_eq!(row.status(), DeploymentStatus::Success);
    assert!(row.completed_at().is_some());
}

async fn test_ingest(app: &TestApp, body: &str, signature: &str) -> bool {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::util::ServiceExt;

    let request = Request::builder()
        .method("POST")
        .uri("/webhook/vercel")
        .header("x-vercel-signature", signature)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request should build");
    let response = app
        .router()
        .oneshot(request)
        .await
        .expect("router should respond");
    response.status() == StatusCode::OK
}

//! Unit tests for per-platform webhook payload parsing.

use crate::deployment::domain::DeploymentStatus;
use crate::hosting::domain::Platform;
use crate::webhook::domain::{WebhookEvent, parse_event};
use rstest::rstest;
use serde_json::json;

#[rstest]
fn vercel_created_event_carries_commit_metadata() {
    let payload = json!({
        "type": "deployment.created",
        "payload": {
            "project": { "id": "prj_1" },
            "deployment": {
                "id": "dpl_1",
                "url": "blog-abc.vercel.app",
                "meta": {
                    "githubCommitSha": "abc123",
                    "githubCommitMessage": "post: hello"
                }
            }
        }
    });

    let event = parse_event(Platform::Vercel, &payload).expect("tracked event");
    assert_eq!(
        event,
        WebhookEvent::DeploymentCreated {
            external_project_id: "prj_1".to_owned(),
            external_deployment_id: "dpl_1".to_owned(),
            deployment_url: Some("https://blog-abc.vercel.app".to_owned()),
            commit_sha: Some("abc123".to_owned()),
            commit_message: Some("post: hello".to_owned()),
        }
    );
}

#[rstest]
#[case("deployment.succeeded", DeploymentStatus::Success)]
#[case("deployment.error", DeploymentStatus::Failed)]
#[case("deployment.canceled", DeploymentStatus::Cancelled)]
fn vercel_status_events_normalize(#[case] event_type: &str, #[case] expected: DeploymentStatus) {
    let payload = json!({
        "type": event_type,
        "payload": {
            "project": { "id": "prj_1" },
            "deployment": { "id": "dpl_1" }
        }
    });

    let event = parse_event(Platform::Vercel, &payload).expect("tracked event");
    assert!(matches!(
        event,
        WebhookEvent::DeploymentStatusChanged { status, .. } if status == expected
    ));
}

#[rstest]
fn netlify_ready_state_is_success() {
    let payload = json!({
        "id": "deploy_9",
        "site_id": "site_3",
        "state": "ready",
        "ssl_url": "https://blog.netlify.app"
    });

    let event = parse_event(Platform::Netlify, &payload).expect("tracked event");
    assert_eq!(
        event,
        WebhookEvent::DeploymentStatusChanged {
            external_project_id: "site_3".to_owned(),
            external_deployment_id: "deploy_9".to_owned(),
            status: DeploymentStatus::Success,
            deployment_url: Some("https://blog.netlify.app".to_owned()),
            error: None,
        }
    );
}

#[rstest]
fn github_pages_built_event_uses_the_repository_slug() {
    let payload = json!({
        "id": 4217,
        "build": { "status": "built", "commit": "abc123" },
        "repository": { "full_name": "alice/blog" }
    });

    let event = parse_event(Platform::GithubPages, &payload).expect("tracked event");
    assert!(matches!(
        event,
        WebhookEvent::DeploymentStatusChanged {
            ref external_project_id,
            ref external_deployment_id,
            status: DeploymentStatus::Success,
            ..
        } if external_project_id == "alice/blog" && external_deployment_id == "4217"
    ));
}

#[rstest]
fn cloudflare_project_deletion_is_tracked() {
    let payload = json!({
        "event": "project.deleted",
        "project": { "name": "blog" }
    });

    let event = parse_event(Platform::CloudflarePages, &payload).expect("tracked event");
    assert_eq!(
        event,
        WebhookEvent::ProjectRemoved {
            external_project_id: "blog".to_owned(),
        }
    );
}

#[rstest]
fn untracked_event_types_parse_to_none() {
    let payload = json!({ "type": "integration-configuration.removed" });
    assert_eq!(parse_event(Platform::Vercel, &payload), None);

    let ping = json!({ "zen": "Design for failure.", "hook_id": 1 });
    assert_eq!(parse_event(Platform::GithubPages, &ping), None);
}

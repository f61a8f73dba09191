//! Unit tests for guarded, partial history updates.

use crate::deployment::domain::{DeploymentHistory, DeploymentStatus, TriggerSource};
use crate::hosting::domain::StatusReport;
use crate::project::domain::ProjectId;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn report(status: DeploymentStatus) -> StatusReport {
    StatusReport {
        status,
        deployment_url: None,
        preview_url: None,
        created_at: None,
        completed_at: None,
        error: None,
    }
}

#[rstest]
fn new_history_starts_pending(clock: DefaultClock) {
    let history = DeploymentHistory::new(ProjectId::new(), "dep-1", TriggerSource::Api, &clock);

    assert_eq!(history.status(), DeploymentStatus::Pending);
    assert_eq!(history.completed_at(), None);
    assert_eq!(history.triggered_by(), TriggerSource::Api);
}

#[rstest]
fn report_only_overwrites_returned_fields(clock: DefaultClock) {
    let mut history = DeploymentHistory::new(ProjectId::new(), "dep-1", TriggerSource::Api, &clock)
        .with_deployment_url("https://blog.stub.app");

    let accepted = history.apply_report(&report(DeploymentStatus::Building), &clock);

    assert!(accepted);
    assert_eq!(history.status(), DeploymentStatus::Building);
    // The poll returned no URL; the recorded one survives.
    assert_eq!(history.deployment_url(), Some("https://blog.stub.app"));
}

#[rstest]
fn terminal_report_sets_completed_at(clock: DefaultClock) {
    let mut history =
        DeploymentHistory::new(ProjectId::new(), "dep-1", TriggerSource::Api, &clock);

    let accepted = history.apply_report(&report(DeploymentStatus::Success), &clock);

    assert!(accepted);
    assert_eq!(history.status(), DeploymentStatus::Success);
    assert!(history.completed_at().is_some());
}

#[rstest]
fn stale_building_report_cannot_reopen_a_finished_deployment(clock: DefaultClock) {
    let mut history =
        DeploymentHistory::new(ProjectId::new(), "dep-1", TriggerSource::Webhook, &clock);
    assert!(history.apply_report(&report(DeploymentStatus::Success), &clock));
    let completed_at = history.completed_at();

    let accepted = history.apply_report(&report(DeploymentStatus::Building), &clock);

    assert!(!accepted);
    assert_eq!(history.status(), DeploymentStatus::Success);
    assert_eq!(history.completed_at(), completed_at);
}

#[rstest]
fn same_status_redelivery_fills_in_late_fields(clock: DefaultClock) {
    let mut history =
        DeploymentHistory::new(ProjectId::new(), "dep-1", TriggerSource::Webhook, &clock);
    assert!(history.apply_report(&report(DeploymentStatus::Failed), &clock));

    let mut redelivery = report(DeploymentStatus::Failed);
    redelivery.error = Some("build exited with 1".to_owned());
    let accepted = history.apply_report(&redelivery, &clock);

    assert!(accepted);
    assert_eq!(history.error_message(), Some("build exited with 1"));
    assert_eq!(history.status(), DeploymentStatus::Failed);
}

#[rstest]
fn terminal_regression_to_other_terminal_is_dropped(clock: DefaultClock) {
    let mut history =
        DeploymentHistory::new(ProjectId::new(), "dep-1", TriggerSource::Webhook, &clock);
    assert!(history.apply_report(&report(DeploymentStatus::Cancelled), &clock));

    let accepted = history.apply_report(&report(DeploymentStatus::Success), &clock);

    assert!(!accepted);
    assert_eq!(history.status(), DeploymentStatus::Cancelled);
}

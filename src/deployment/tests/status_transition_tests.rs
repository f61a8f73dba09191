//! Unit tests for deployment status transition validation.

use crate::deployment::domain::DeploymentStatus;
use rstest::rstest;

#[rstest]
#[case(DeploymentStatus::Pending, DeploymentStatus::Pending, true)]
#[case(DeploymentStatus::Pending, DeploymentStatus::Building, true)]
#[case(DeploymentStatus::Pending, DeploymentStatus::Success, true)]
#[case(DeploymentStatus::Pending, DeploymentStatus::Failed, true)]
#[case(DeploymentStatus::Pending, DeploymentStatus::Cancelled, true)]
#[case(DeploymentStatus::Building, DeploymentStatus::Pending, false)]
#[case(DeploymentStatus::Building, DeploymentStatus::Building, true)]
#[case(DeploymentStatus::Building, DeploymentStatus::Success, true)]
#[case(DeploymentStatus::Building, DeploymentStatus::Failed, true)]
#[case(DeploymentStatus::Building, DeploymentStatus::Cancelled, true)]
#[case(DeploymentStatus::Success, DeploymentStatus::Pending, false)]
#[case(DeploymentStatus::Success, DeploymentStatus::Building, false)]
#[case(DeploymentStatus::Success, DeploymentStatus::Success, true)]
#[case(DeploymentStatus::Success, DeploymentStatus::Failed, false)]
#[case(DeploymentStatus::Success, DeploymentStatus::Cancelled, false)]
#[case(DeploymentStatus::Failed, DeploymentStatus::Pending, false)]
#[case(DeploymentStatus::Failed, DeploymentStatus::Building, false)]
#[case(DeploymentStatus::Failed, DeploymentStatus::Success, false)]
#[case(DeploymentStatus::Failed, DeploymentStatus::Failed, true)]
#[case(DeploymentStatus::Failed, DeploymentStatus::Cancelled, false)]
#[case(DeploymentStatus::Cancelled, DeploymentStatus::Pending, false)]
#[case(DeploymentStatus::Cancelled, DeploymentStatus::Building, false)]
#[case(DeploymentStatus::Cancelled, DeploymentStatus::Success, false)]
#[case(DeploymentStatus::Cancelled, DeploymentStatus::Failed, false)]
#[case(DeploymentStatus::Cancelled, DeploymentStatus::Cancelled, true)]
fn can_transition_to_returns_expected(
    #[case] from: DeploymentStatus,
    #[case] to: DeploymentStatus,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
#[case(DeploymentStatus::Pending, false)]
#[case(DeploymentStatus::Building, false)]
#[case(DeploymentStatus::Success, true)]
#[case(DeploymentStatus::Failed, true)]
#[case(DeploymentStatus::Cancelled, true)]
fn is_terminal_returns_expected(#[case] status: DeploymentStatus, #[case] expected: bool) {
    assert_eq!(status.is_terminal(), expected);
}

#[rstest]
#[case("pending", DeploymentStatus::Pending)]
#[case("building", DeploymentStatus::Building)]
#[case("success", DeploymentStatus::Success)]
#[case("failed", DeploymentStatus::Failed)]
#[case("cancelled", DeploymentStatus::Cancelled)]
fn storage_representation_round_trips(#[case] raw: &str, #[case] status: DeploymentStatus) {
    assert_eq!(status.as_str(), raw);
    assert_eq!(DeploymentStatus::try_from(raw), Ok(status));
}

#[rstest]
fn unknown_status_is_rejected() {
    assert!(DeploymentStatus::try_from("queued").is_err());
}

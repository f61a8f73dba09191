//! Deployment lifecycle status and transition rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Status of one deployment attempt, as reported by the hosting platform.
///
/// The core never invents a transition; it only records what the platform
/// reports through polling or webhooks. Transitions are validated so that a
/// stale non-terminal event cannot overwrite a terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    /// The deployment was accepted but the build has not started.
    Pending,
    /// The platform is building and publishing the deployment.
    Building,
    /// The deployment is live.
    Success,
    /// The build or publish step failed.
    Failed,
    /// The deployment was cancelled on the platform.
    Cancelled,
}

impl DeploymentStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Building => "building",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether this status is a terminal outcome.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Cancelled)
    }

    /// Returns whether a reported transition from `self` to `next` is
    /// acceptable.
    ///
    /// Re-reporting the current status is acceptable (webhook re-delivery is
    /// idempotent); any move out of a terminal status is not.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Pending => true,
            Self::Building => !matches!(next, Self::Pending),
            Self::Success => matches!(next, Self::Success),
            Self::Failed => matches!(next, Self::Failed),
            Self::Cancelled => matches!(next, Self::Cancelled),
        }
    }
}

impl TryFrom<&str> for DeploymentStatus {
    type Error = ParseDeploymentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "building" => Ok(Self::Building),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseDeploymentStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing deployment statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown deployment status: {0}")]
pub struct ParseDeploymentStatusError(pub String);

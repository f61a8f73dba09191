//! Domain model for deployment history tracking.

mod history;
mod ids;
mod status;

pub use history::{
    DeploymentHistory, ParseTriggerSourceError, PersistedHistoryData, TriggerSource,
};
pub use ids::DeploymentId;
pub use status::{DeploymentStatus, ParseDeploymentStatusError};

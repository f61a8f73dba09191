//! Service layer for deployment orchestration.

pub mod orchestrator;

pub use orchestrator::{
    DeploymentService, DeploymentServiceError, DeploymentServiceResult, TriggerDeployRequest,
    TriggeredDeployment,
};

//! Port contracts for deployment history tracking.

pub mod repository;

pub use repository::{
    DeploymentHistoryError, DeploymentHistoryRepository, DeploymentHistoryResult,
};

//! Domain model for deployment project registration.

mod error;
mod ids;
mod project;
mod repository;

pub use error::ProjectDomainError;
pub use ids::{ProjectId, RepositoryId};
pub use project::{DeploymentProject, PersistedProjectData};
pub use repository::SourceRepository;

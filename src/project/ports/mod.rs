//! Port contracts for project registration.

pub mod repository;

pub use repository::{
    ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult, RepositoryDirectory,
};

//! Adapter implementations for project registration.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryProjectRepository, InMemoryRepositoryDirectory};
pub use postgres::{PostgresProjectRepository, PostgresRepositoryDirectory, ProjectPgPool};

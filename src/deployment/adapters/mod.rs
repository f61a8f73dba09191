//! Adapter implementations for deployment history persistence.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDeploymentHistoryRepository;
pub use postgres::{HistoryPgPool, PostgresDeploymentHistoryRepository};

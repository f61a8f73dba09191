//! `PostgreSQL` adapters for deployment history persistence.

mod models;
mod repository;
mod schema;

pub use repository::{HistoryPgPool, PostgresDeploymentHistoryRepository};

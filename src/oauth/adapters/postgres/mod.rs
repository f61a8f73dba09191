//! `PostgreSQL` adapters for OAuth state persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresStateRepository, StatePgPool};

//! Adapter implementations for OAuth state persistence.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStateRepository;
pub use postgres::{PostgresStateRepository, StatePgPool};

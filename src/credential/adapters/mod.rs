//! Adapter implementations for credential persistence.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCredentialRepository;
pub use postgres::{CredentialPgPool, PostgresCredentialRepository};

//! Port contracts for OAuth state persistence.

pub mod repository;

pub use repository::{StateRepository, StateRepositoryError, StateRepositoryResult};

//! Deployment lifecycle tracking for Halyard.
//!
//! One history row per attempt, driven `pending -> building -> {success |
//! failed | cancelled}` entirely by what the platform reports through
//! polling and webhooks. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Deployment project registration for Halyard.
//!
//! Maps source repositories to platform projects, enforces per-platform
//! custom-domain limits, and keeps local records a cache of the platform's
//! view: provider calls succeed first, persistence follows. The module
//! follows hexagonal architecture:
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

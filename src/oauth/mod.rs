//! OAuth CSRF protection and the platform connect flow for Halyard.
//!
//! State tokens are single-use and expiring: issued when the browser is sent
//! to a platform's authorization page and consumed exactly once when the
//! callback returns, whether or not validation succeeds. The module follows
//! hexagonal architecture:
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

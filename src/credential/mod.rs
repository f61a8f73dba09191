//! Platform credential storage for Halyard.
//!
//! One credential per `(user, platform)` pair with upsert-on-reconnect
//! semantics, disconnect blocked while active deployment projects remain,
//! and a pluggable token cipher around persistence. The module follows
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

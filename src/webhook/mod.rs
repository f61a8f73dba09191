//! Signed webhook ingestion for Halyard.
//!
//! Platforms push deployment and project lifecycle events; deliveries are
//! authenticated by HMAC over the raw body, matched to local records by the
//! platform's external identifiers, and applied idempotently. The module
//! layout follows the rest of the crate:
//!
//! - Normalized events in [`domain`]
//! - Signature verification in [`signature`]
//! - The ingestor service in [`services`]

pub mod domain;
pub mod services;
pub mod signature;

#[cfg(test)]
mod tests;

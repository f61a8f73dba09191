//! Error types for project domain validation.

use crate::hosting::domain::Platform;
use thiserror::Error;

/// Errors returned while mutating project domain state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The platform's custom-domain limit is already reached.
    #[error("{platform} allows at most {limit} custom domains")]
    DomainLimitReached {
        /// Platform enforcing the limit.
        platform: Platform,
        /// Maximum number of custom domains.
        limit: usize,
    },

    /// The domain is already attached to the project.
    #[error("domain {0} is already configured")]
    DuplicateDomain(String),

    /// The domain is not attached to the project.
    #[error("domain {0} is not configured")]
    UnknownDomain(String),

    /// The platform does not support custom domains at all.
    #[error("{0} does not support custom domains")]
    CustomDomainsUnsupported(Platform),
}

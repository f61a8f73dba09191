//! Error types for provider adapter operations.

use super::domain::Platform;
use thiserror::Error;

/// Result type for provider adapter operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by provider adapters.
///
/// Every variant carries the platform so callers can report which upstream
/// service failed without inspecting adapter internals. Raw credentials never
/// appear in messages. Adapters do not retry; the caller decides.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The platform has no equivalent of the requested operation.
    ///
    /// Callers are expected to consult
    /// [`PlatformCapabilities`](super::domain::PlatformCapabilities) before
    /// invoking optional operations.
    #[error("{platform} does not support {operation}")]
    Unsupported {
        /// Platform that lacks the operation.
        platform: Platform,
        /// Name of the unsupported operation.
        operation: &'static str,
    },

    /// The platform API could not be reached.
    #[error("could not reach {platform}: {message}")]
    Connection {
        /// Platform whose API was unreachable.
        platform: Platform,
        /// Transport-level failure description.
        message: String,
    },

    /// The platform API answered with an error.
    #[error("{platform} API error: {message}")]
    Api {
        /// Platform that rejected the request.
        platform: Platform,
        /// Platform-supplied error text, where safe to relay.
        message: String,
    },

    /// The platform API answered with a shape the adapter cannot read.
    #[error("unexpected {platform} response: {message}")]
    UnexpectedResponse {
        /// Platform that produced the response.
        platform: Platform,
        /// Description of the missing or malformed field.
        message: String,
    },
}

impl ProviderError {
    /// Builds an [`ProviderError::Unsupported`] error.
    #[must_use]
    pub const fn unsupported(platform: Platform, operation: &'static str) -> Self {
        Self::Unsupported {
            platform,
            operation,
        }
    }

    /// Wraps a transport failure.
    pub fn connection(platform: Platform, err: impl std::fmt::Display) -> Self {
        Self::Connection {
            platform,
            message: err.to_string(),
        }
    }

    /// Wraps a platform-reported API error.
    pub fn api(platform: Platform, message: impl Into<String>) -> Self {
        Self::Api {
            platform,
            message: message.into(),
        }
    }

    /// Wraps a malformed or unreadable response.
    pub fn unexpected(platform: Platform, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            platform,
            message: message.into(),
        }
    }

    /// Returns the platform this error originated from.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        match self {
            Self::Unsupported { platform, .. }
            | Self::Connection { platform, .. }
            | Self::Api { platform, .. }
            | Self::UnexpectedResponse { platform, .. } => *platform,
        }
    }
}

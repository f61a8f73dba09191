//! Port for probing whether a platform connection is still in use.

use crate::credential::domain::UserId;
use crate::hosting::domain::Platform;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for active-project probes.
pub type ActiveProjectProbeResult<T> = Result<T, ActiveProjectProbeError>;

/// Answers whether a user still has active projects on a platform.
///
/// Disconnecting a platform is blocked while any remain; the probe keeps the
/// credential store from depending on project persistence directly.
#[async_trait]
pub trait ActiveProjectProbe: Send + Sync {
    /// Returns `true` when at least one active project exists for the
    /// `(user, platform)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`ActiveProjectProbeError`] when the lookup fails.
    async fn has_active_projects(
        &self,
        user_id: UserId,
        platform: Platform,
    ) -> ActiveProjectProbeResult<bool>;
}

/// Errors returned by active-project probe implementations.
#[derive(Debug, Clone, Error)]
#[error("active project probe failed: {0}")]
pub struct ActiveProjectProbeError(pub Arc<dyn std::error::Error + Send + Sync>);

impl ActiveProjectProbeError {
    /// Wraps a lookup error.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}

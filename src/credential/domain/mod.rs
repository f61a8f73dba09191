//! Domain model for platform credential storage.

mod credential;
mod ids;

pub use credential::{PersistedCredentialData, PlatformCredential};
pub use ids::UserId;

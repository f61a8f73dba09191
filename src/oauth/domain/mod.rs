//! Domain model for OAuth CSRF protection.

mod state;

pub use state::{OAuthState, PersistedStateData, STATE_TTL, StateId};

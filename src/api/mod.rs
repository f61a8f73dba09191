//! HTTP surface for Halyard.
//!
//! Thin handlers over the context services: authentication through an
//! opaque session port, the error taxonomy mapped to status codes with JSON
//! `{"error"}` bodies, and a per-client rate limit on the routes that make
//! expensive third-party calls.

pub mod auth;
pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod state;

mod handlers;

pub use auth::{Authenticator, StaticTokenAuthenticator};
pub use error::ApiError;
pub use rate_limit::RateLimiter;
pub use routes::router;
pub use state::AppState;

//! Service layer for the OAuth connect flow.

pub mod connect;
pub mod guard;

pub use connect::{
    AuthorizationRedirect, CallbackParams, ConnectFlowError, ConnectFlowResult,
    ConnectFlowService,
};
pub use guard::{StateGuardError, StateGuardResult, StateGuardService, StateVerdict};

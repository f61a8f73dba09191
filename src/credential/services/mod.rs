//! Service layer for credential storage.

pub mod store;

pub use store::{
    ConnectPlatformRequest, CredentialService, CredentialServiceError, CredentialServiceResult,
};

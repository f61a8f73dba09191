//! Port contracts for credential storage.

pub mod cipher;
pub mod projects;
pub mod repository;

pub use cipher::{PlaintextTokenCipher, TokenCipher, TokenCipherError, TokenCipherResult};
pub use projects::{ActiveProjectProbe, ActiveProjectProbeError, ActiveProjectProbeResult};
pub use repository::{CredentialRepository, CredentialRepositoryError, CredentialRepositoryResult};

//! Pluggable encryption strategy for stored access tokens.

use thiserror::Error;

/// Result type for token cipher operations.
pub type TokenCipherResult<T> = Result<T, TokenCipherError>;

/// Strategy applied to access tokens around persistence.
///
/// The credential service seals every token before it reaches storage and
/// opens it again after reads, so swapping in a real encryption scheme is a
/// wiring change, not a storage-contract change.
pub trait TokenCipher: Send + Sync {
    /// Transforms a plaintext token into its stored representation.
    ///
    /// # Errors
    ///
    /// Returns [`TokenCipherError`] when the token cannot be sealed.
    fn seal(&self, token: &str) -> TokenCipherResult<String>;

    /// Recovers the plaintext token from its stored representation.
    ///
    /// # Errors
    ///
    /// Returns [`TokenCipherError`] when the stored value cannot be opened.
    fn open(&self, sealed: &str) -> TokenCipherResult<String>;
}

/// Errors returned by token cipher implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("token cipher failure: {0}")]
pub struct TokenCipherError(pub String);

/// Identity cipher that stores tokens as-is.
///
/// TODO: replace with an AEAD-backed cipher before handling production
/// tokens; the port exists so that swap stays local to process wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextTokenCipher;

impl TokenCipher for PlaintextTokenCipher {
    fn seal(&self, token: &str) -> TokenCipherResult<String> {
        Ok(token.to_owned())
    }

    fn open(&self, sealed: &str) -> TokenCipherResult<String> {
        Ok(sealed.to_owned())
    }
}

//! HMAC verification of inbound platform webhooks.
//!
//! Signatures are verified over the raw request body before any parsing.
//! The comparison runs in constant time via [`Mac::verify_slice`].

use crate::hosting::domain::Platform;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;
type HmacSha1 = Hmac<Sha1>;

/// Digest algorithm a platform signs its webhooks with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// HMAC-SHA256, hex-encoded.
    HmacSha256,
    /// HMAC-SHA1, hex-encoded.
    HmacSha1,
}

/// How one platform delivers its webhook signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureSpec {
    /// Request header carrying the signature.
    pub header: &'static str,
    /// Digest algorithm.
    pub scheme: SignatureScheme,
    /// Literal prefix before the hex digest, when the platform uses one.
    pub value_prefix: Option<&'static str>,
}

impl SignatureSpec {
    /// Returns the signature convention for a platform.
    #[must_use]
    pub const fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::GithubPages => Self {
                header: "x-hub-signature-256",
                scheme: SignatureScheme::HmacSha256,
                value_prefix: Some("sha256="),
            },
            Platform::Vercel => Self {
                header: "x-vercel-signature",
                scheme: SignatureScheme::HmacSha1,
                value_prefix: None,
            },
            Platform::Netlify => Self {
                header: "x-webhook-signature",
                scheme: SignatureScheme::HmacSha256,
                value_prefix: None,
            },
            Platform::CloudflarePages => Self {
                header: "cf-webhook-auth",
                scheme: SignatureScheme::HmacSha256,
                value_prefix: None,
            },
        }
    }
}

/// Errors raised while authenticating a webhook delivery.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature header was absent.
    #[error("missing webhook signature header")]
    Missing,

    /// The signature value was not valid hex of the right shape.
    #[error("malformed webhook signature")]
    Malformed,

    /// The signature did not match the request body.
    #[error("webhook signature mismatch")]
    Mismatch,
}

/// Verifies a platform webhook signature over the raw request body.
///
/// # Errors
///
/// Returns [`SignatureError`] when the signature is absent, undecodable, or
/// does not match.
pub fn verify_signature(
    platform: Platform,
    secret: &str,
    body: &[u8],
    provided: Option<&str>,
) -> Result<(), SignatureError> {
    let spec = SignatureSpec::for_platform(platform);
    let provided = provided.ok_or(SignatureError::Missing)?;

    let hex_digest = match spec.value_prefix {
        Some(prefix) => provided
            .strip_prefix(prefix)
            .ok_or(SignatureError::Malformed)?,
        None => provided,
    };
    let expected = hex::decode(hex_digest).map_err(|_| SignatureError::Malformed)?;

    match spec.scheme {
        SignatureScheme::HmacSha256 => {
            let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
                .map_err(|_| SignatureError::Malformed)?;
            mac.update(body);
            mac.verify_slice(&expected)
                .map_err(|_| SignatureError::Mismatch)
        }
        SignatureScheme::HmacSha1 => {
            let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
                .map_err(|_| SignatureError::Malformed)?;
            mac.update(body);
            mac.verify_slice(&expected)
                .map_err(|_| SignatureError::Mismatch)
        }
    }
}

/// Computes the hex signature a platform would send for a body.
///
/// Test helper for constructing authentic-looking deliveries; the prefix is
/// not included.
#[must_use]
pub fn sign_body(platform: Platform, secret: &str, body: &[u8]) -> String {
    let spec = SignatureSpec::for_platform(platform);
    match spec.scheme {
        SignatureScheme::HmacSha256 => HmacSha256::new_from_slice(secret.as_bytes())
            .map(|mut mac| {
                mac.update(body);
                hex::encode(mac.finalize().into_bytes())
            })
            .unwrap_or_default(),
        SignatureScheme::HmacSha1 => HmacSha1::new_from_slice(secret.as_bytes())
            .map(|mut mac| {
                mac.update(body);
                hex::encode(mac.finalize().into_bytes())
            })
            .unwrap_or_default(),
    }
}

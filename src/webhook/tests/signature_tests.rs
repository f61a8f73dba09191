//! Unit tests for webhook signature verification.

use crate::hosting::domain::Platform;
use crate::webhook::signature::{SignatureError, SignatureSpec, sign_body, verify_signature};
use rstest::rstest;

const SECRET: &str = "whsec_test";
const BODY: &[u8] = br#"{"type":"deployment.succeeded"}"#;

#[rstest]
#[case(Platform::Vercel)]
#[case(Platform::Netlify)]
#[case(Platform::CloudflarePages)]
fn bare_hex_signatures_verify(#[case] platform: Platform) {
    let signature = sign_body(platform, SECRET, BODY);
    assert!(verify_signature(platform, SECRET, BODY, Some(&signature)).is_ok());
}

#[rstest]
fn github_signature_requires_the_sha256_prefix() {
    let digest = sign_body(Platform::GithubPages, SECRET, BODY);

    let prefixed = format!("sha256={digest}");
    assert!(verify_signature(Platform::GithubPages, SECRET, BODY, Some(&prefixed)).is_ok());

    assert_eq!(
        verify_signature(Platform::GithubPages, SECRET, BODY, Some(&digest)),
        Err(SignatureError::Malformed)
    );
}

#[rstest]
fn missing_signature_is_rejected() {
    assert_eq!(
        verify_signature(Platform::Vercel, SECRET, BODY, None),
        Err(SignatureError::Missing)
    );
}

#[rstest]
fn non_hex_signature_is_rejected() {
    assert_eq!(
        verify_signature(Platform::Vercel, SECRET, BODY, Some("not-hex!")),
        Err(SignatureError::Malformed)
    );
}

#[rstest]
fn wrong_secret_is_rejected() {
    let signature = sign_body(Platform::Vercel, "other_secret", BODY);
    assert_eq!(
        verify_signature(Platform::Vercel, SECRET, BODY, Some(&signature)),
        Err(SignatureError::Mismatch)
    );
}

#[rstest]
fn tampered_body_is_rejected() {
    let signature = sign_body(Platform::Netlify, SECRET, BODY);
    assert_eq!(
        verify_signature(Platform::Netlify, SECRET, b"{}", Some(&signature)),
        Err(SignatureError::Mismatch)
    );
}

#[rstest]
fn each_platform_declares_a_signature_header() {
    for platform in crate::hosting::domain::ALL_PLATFORMS {
        let spec = SignatureSpec::for_platform(platform);
        assert!(!spec.header.is_empty());
    }
}

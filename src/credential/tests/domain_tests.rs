//! Unit tests for the credential aggregate.

use crate::credential::domain::{PlatformCredential, UserId};
use crate::hosting::domain::Platform;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
fn new_credential_starts_without_scoping_ids(clock: DefaultClock) {
    let credential =
        PlatformCredential::new(UserId::new(), Platform::Vercel, "tok_abc", &clock);

    assert_eq!(credential.access_token(), "tok_abc");
    assert_eq!(credential.team_id(), None);
    assert_eq!(credential.account_id(), None);
    assert_eq!(credential.created_at(), credential.updated_at());
}

#[rstest]
fn rotate_replaces_token_and_scoping(clock: DefaultClock) {
    let mut credential =
        PlatformCredential::new(UserId::new(), Platform::Vercel, "tok_old", &clock)
            .with_team_id("team_1");

    credential.rotate("tok_new", None, Some("acct_9".to_owned()), &clock);

    assert_eq!(credential.access_token(), "tok_new");
    assert_eq!(credential.team_id(), None);
    assert_eq!(credential.account_id(), Some("acct_9"));
    assert!(credential.updated_at() >= credential.created_at());
}

#[rstest]
fn provider_credentials_carry_scoping_ids(clock: DefaultClock) {
    let credential = PlatformCredential::new(
        UserId::new(),
        Platform::CloudflarePages,
        "cf_token",
        &clock,
    )
    .with_account_id("acct_42");

    let provider = credential.provider_credentials();
    assert_eq!(provider.access_token(), "cf_token");
    assert_eq!(provider.account_id(), Some("acct_42"));
    assert_eq!(provider.team_id(), None);
}

//! Unit tests for the credential service.

use crate::credential::adapters::InMemoryCredentialRepository;
use crate::credential::domain::UserId;
use crate::credential::ports::{
    ActiveProjectProbe, ActiveProjectProbeResult, CredentialRepository, PlaintextTokenCipher,
    TokenCipher, TokenCipherResult,
};
use crate::credential::services::{
    ConnectPlatformRequest, CredentialService, CredentialServiceError,
};
use crate::hosting::domain::Platform;
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Probe with a switchable answer.
#[derive(Debug, Default)]
struct FixedProbe {
    active: AtomicBool,
}

impl FixedProbe {
    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

#[async_trait]
impl ActiveProjectProbe for FixedProbe {
    async fn has_active_projects(
        &self,
        _user_id: UserId,
        _platform: Platform,
    ) -> ActiveProjectProbeResult<bool> {
        Ok(self.active.load(Ordering::SeqCst))
    }
}

/// Cipher that visibly transforms tokens, to prove the store round-trips
/// every token through the strategy.
#[derive(Debug, Clone, Copy)]
struct MarkingCipher;

impl TokenCipher for MarkingCipher {
    fn seal(&self, token: &str) -> TokenCipherResult<String> {
        Ok(format!("sealed:{token}"))
    }

    fn open(&self, sealed: &str) -> TokenCipherResult<String> {
        Ok(sealed.trim_start_matches("sealed:").to_owned())
    }
}

struct Harness {
    service: CredentialService,
    repository: Arc<InMemoryCredentialRepository>,
    probe: Arc<FixedProbe>,
}

fn harness_with_cipher(cipher: Arc<dyn TokenCipher>) -> Harness {
    let repository = Arc::new(InMemoryCredentialRepository::new());
    let probe = Arc::new(FixedProbe::default());
    let service = CredentialService::new(
        repository.clone(),
        probe.clone(),
        cipher,
        Arc::new(DefaultClock),
    );
    Harness {
        service,
        repository,
        probe,
    }
}

#[fixture]
fn harness() -> Harness {
    harness_with_cipher(Arc::new(PlaintextTokenCipher))
}

#[fixture]
fn user() -> UserId {
    UserId::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connect_twice_keeps_one_row_with_second_token(harness: Harness, user: UserId) {
    harness
        .service
        .connect(user, ConnectPlatformRequest::new(Platform::Vercel, "tok_first"))
        .await
        .expect("first connect should succeed");
    harness
        .service
        .connect(
            user,
            ConnectPlatformRequest::new(Platform::Vercel, "tok_second"),
        )
        .await
        .expect("second connect should succeed");

    let stored = harness
        .service
        .list(user)
        .await
        .expect("listing should succeed");
    assert_eq!(stored.len(), 1);
    assert_eq!(
        stored.first().expect("one row").access_token(),
        "tok_second"
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconnect_preserves_created_at(harness: Harness, user: UserId) {
    let first = harness
        .service
        .connect(user, ConnectPlatformRequest::new(Platform::Netlify, "tok_a"))
        .await
        .expect("first connect should succeed");
    let second = harness
        .service
        .connect(user, ConnectPlatformRequest::new(Platform::Netlify, "tok_b"))
        .await
        .expect("second connect should succeed");

    assert_eq!(second.created_at(), first.created_at());
    assert!(second.updated_at() >= first.updated_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tokens_pass_through_the_cipher_around_persistence(user: UserId) {
    let harness = harness_with_cipher(Arc::new(MarkingCipher));
    harness
        .service
        .connect(user, ConnectPlatformRequest::new(Platform::Vercel, "tok_abc"))
        .await
        .expect("connect should succeed");

    // The repository sees only the sealed form.
    let raw = harness
        .repository
        .find(user, Platform::Vercel)
        .await
        .expect("raw lookup should succeed")
        .expect("credential should be stored");
    assert_eq!(raw.access_token(), "sealed:tok_abc");

    // Callers see plaintext again.
    let opened = harness
        .service
        .require(user, Platform::Vercel)
        .await
        .expect("opened lookup should succeed");
    assert_eq!(opened.access_token(), "tok_abc");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disconnect_is_blocked_while_projects_are_active(harness: Harness, user: UserId) {
    harness
        .service
        .connect(user, ConnectPlatformRequest::new(Platform::Vercel, "tok_abc"))
        .await
        .expect("connect should succeed");
    harness.probe.set_active(true);

    let blocked = harness.service.disconnect(user, Platform::Vercel).await;
    assert!(matches!(
        blocked,
        Err(CredentialServiceError::ActiveProjectsExist {
            platform: Platform::Vercel
        })
    ));

    harness.probe.set_active(false);
    harness
        .service
        .disconnect(user, Platform::Vercel)
        .await
        .expect("disconnect should succeed once projects are gone");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disconnecting_unconnected_platform_is_not_found(harness: Harness, user: UserId) {
    let result = harness.service.disconnect(user, Platform::Netlify).await;
    assert!(matches!(
        result,
        Err(CredentialServiceError::NotConnected {
            platform: Platform::Netlify
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn credentials_are_scoped_per_user(harness: Harness) {
    let alice = UserId::new();
    let bob = UserId::new();
    harness
        .service
        .connect(alice, ConnectPlatformRequest::new(Platform::Vercel, "tok_a"))
        .await
        .expect("connect should succeed");

    let bobs = harness
        .service
        .get(bob, Platform::Vercel)
        .await
        .expect("lookup should succeed");
    assert!(bobs.is_none());
}

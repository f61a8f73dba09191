//! Unit tests for capability-gated default operations.

use crate::hosting::adapters::GithubPagesProvider;
use crate::hosting::domain::{Platform, ProviderCredentials};
use crate::hosting::error::ProviderError;
use crate::hosting::ports::HostingProvider;
use rstest::{fixture, rstest};

#[fixture]
fn provider() -> GithubPagesProvider {
    GithubPagesProvider::new(reqwest::Client::new())
}

#[fixture]
fn credentials() -> ProviderCredentials {
    ProviderCredentials::new("ghs_token".to_owned())
}

#[rstest]
fn authorization_url_is_unsupported(provider: GithubPagesProvider) {
    let result = provider.authorization_url("https://app.example.com/cb", "state");
    assert!(matches!(
        result,
        Err(ProviderError::Unsupported {
            platform: Platform::GithubPages,
            operation: "authorization_url",
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exchange_code_is_unsupported(provider: GithubPagesProvider) {
    let result = provider
        .exchange_code("code", "https://app.example.com/cb")
        .await;
    assert!(matches!(result, Err(ProviderError::Unsupported { .. })));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deployment_logs_are_unsupported(
    provider: GithubPagesProvider,
    credentials: ProviderCredentials,
) {
    let result = provider
        .deployment_logs(&credentials, "owner/repo", "latest", None)
        .await;
    assert!(matches!(result, Err(ProviderError::Unsupported { .. })));

    // The capability descriptor tells callers not to get here.
    assert!(!provider.capabilities().supports_deployment_logs());
}

//! Unit tests for platform identifier parsing and display.

use crate::hosting::domain::{ALL_PLATFORMS, ParsePlatformError, Platform};
use rstest::rstest;

#[rstest]
#[case(Platform::GithubPages, "github-pages")]
#[case(Platform::Vercel, "vercel")]
#[case(Platform::Netlify, "netlify")]
#[case(Platform::CloudflarePages, "cloudflare-pages")]
fn as_str_round_trips(#[case] platform: Platform, #[case] expected: &str) {
    assert_eq!(platform.as_str(), expected);
    assert_eq!(Platform::try_from(expected), Ok(platform));
}

#[rstest]
fn parsing_normalizes_case_and_whitespace() {
    assert_eq!(Platform::try_from(" Vercel "), Ok(Platform::Vercel));
    assert_eq!(
        Platform::try_from("GITHUB-PAGES"),
        Ok(Platform::GithubPages)
    );
}

#[rstest]
fn unknown_platform_is_rejected() {
    assert_eq!(
        Platform::try_from("heroku"),
        Err(ParsePlatformError("heroku".to_owned()))
    );
}

#[rstest]
fn serde_uses_kebab_case() -> eyre::Result<()> {
    let serialized = serde_json::to_string(&Platform::CloudflarePages)?;
    assert_eq!(serialized, "\"cloudflare-pages\"");
    let parsed: Platform = serde_json::from_str("\"github-pages\"")?;
    assert_eq!(parsed, Platform::GithubPages);
    Ok(())
}

#[rstest]
fn display_names_cover_all_platforms() {
    for platform in ALL_PLATFORMS {
        assert!(!platform.display_name().is_empty());
    }
}

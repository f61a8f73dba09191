//! Hosting platform identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Static-site hosting platform supported by the deployment core.
///
/// The set is closed on purpose: each variant is bound to exactly one
/// provider adapter when the registry is built at startup. Adding a platform
/// means adding a variant and an adapter, not extending a lookup table at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// GitHub Pages. Deploys are Pages builds on the repository itself.
    GithubPages,
    /// Vercel.
    Vercel,
    /// Netlify.
    Netlify,
    /// Cloudflare Pages.
    CloudflarePages,
}

/// All supported platforms, in display order.
pub const ALL_PLATFORMS: [Platform; 4] = [
    Platform::GithubPages,
    Platform::Vercel,
    Platform::Netlify,
    Platform::CloudflarePages,
];

impl Platform {
    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GithubPages => "github-pages",
            Self::Vercel => "vercel",
            Self::Netlify => "netlify",
            Self::CloudflarePages => "cloudflare-pages",
        }
    }

    /// Returns the human-readable platform name for UI listings.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::GithubPages => "GitHub Pages",
            Self::Vercel => "Vercel",
            Self::Netlify => "Netlify",
            Self::CloudflarePages => "Cloudflare Pages",
        }
    }
}

impl TryFrom<&str> for Platform {
    type Error = ParsePlatformError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "github-pages" => Ok(Self::GithubPages),
            "vercel" => Ok(Self::Vercel),
            "netlify" => Ok(Self::Netlify),
            "cloudflare-pages" => Ok(Self::CloudflarePages),
            _ => Err(ParsePlatformError(value.to_owned())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing platform identifiers from wire or storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported platform: {0}")]
pub struct ParsePlatformError(pub String);

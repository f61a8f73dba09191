//! Static per-platform capability descriptors.

use super::Platform;
use serde::{Deserialize, Serialize};

/// Limits and optional features of a hosting platform.
///
/// Callers consult the descriptor before invoking an operation that a
/// platform may not support; platform-inapplicable trait methods keep their
/// default `Unsupported` body and are never probed by reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    max_custom_domains: usize,
    supports_oauth: bool,
    supports_preview_deployments: bool,
    supports_deployment_logs: bool,
    supports_custom_domains: bool,
}

impl PlatformCapabilities {
    /// Returns the capability descriptor for a platform.
    #[must_use]
    pub const fn for_platform(platform: Platform) -> Self {
        match platform {
            // Pages binds one CNAME to the repository site.
            Platform::GithubPages => Self {
                max_custom_domains: 1,
                supports_oauth: false,
                supports_preview_deployments: false,
                supports_deployment_logs: false,
                supports_custom_domains: true,
            },
            Platform::Vercel => Self {
                max_custom_domains: 50,
                supports_oauth: true,
                supports_preview_deployments: true,
                supports_deployment_logs: true,
                supports_custom_domains: true,
            },
            Platform::Netlify => Self {
                max_custom_domains: 10,
                supports_oauth: true,
                supports_preview_deployments: true,
                supports_deployment_logs: false,
                supports_custom_domains: true,
            },
            Platform::CloudflarePages => Self {
                max_custom_domains: 10,
                supports_oauth: false,
                supports_preview_deployments: true,
                supports_deployment_logs: true,
                supports_custom_domains: true,
            },
        }
    }

    /// Returns the maximum number of custom domains per project.
    #[must_use]
    pub const fn max_custom_domains(&self) -> usize {
        self.max_custom_domains
    }

    /// Returns whether the platform is connected through the OAuth
    /// authorization-code flow.
    #[must_use]
    pub const fn supports_oauth(&self) -> bool {
        self.supports_oauth
    }

    /// Returns whether non-production deploys produce preview URLs.
    #[must_use]
    pub const fn supports_preview_deployments(&self) -> bool {
        self.supports_preview_deployments
    }

    /// Returns whether per-deployment build logs can be fetched.
    #[must_use]
    pub const fn supports_deployment_logs(&self) -> bool {
        self.supports_deployment_logs
    }

    /// Returns whether custom domains can be attached at all.
    #[must_use]
    pub const fn supports_custom_domains(&self) -> bool {
        self.supports_custom_domains
    }
}

impl Platform {
    /// Returns this platform's capability descriptor.
    #[must_use]
    pub const fn capabilities(self) -> PlatformCapabilities {
        PlatformCapabilities::for_platform(self)
    }
}

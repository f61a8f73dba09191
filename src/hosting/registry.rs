//! Startup-time binding of platforms to provider adapters.

use super::adapters::{CloudflarePagesProvider, GithubPagesProvider, NetlifyProvider, VercelProvider};
use super::domain::{ALL_PLATFORMS, Platform};
use super::ports::HostingProvider;
use crate::config::PlatformSettings;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps each supported platform to its provider adapter.
///
/// Built once at process startup; resolution afterwards is an infallible
/// lookup over the closed [`Platform`] set.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: HashMap<Platform, Arc<dyn HostingProvider>>,
}

impl ProviderRegistry {
    /// Builds a registry from explicit platform/adapter bindings.
    ///
    /// Later bindings for the same platform replace earlier ones.
    #[must_use]
    pub fn new(bindings: impl IntoIterator<Item = Arc<dyn HostingProvider>>) -> Self {
        let providers = bindings
            .into_iter()
            .map(|provider| (provider.platform(), provider))
            .collect();
        Self { providers }
    }

    /// Builds the production registry with one adapter per platform.
    #[must_use]
    pub fn with_default_providers(settings: &PlatformSettings) -> Self {
        let client = reqwest::Client::new();
        Self::new([
            Arc::new(GithubPagesProvider::new(client.clone())) as Arc<dyn HostingProvider>,
            Arc::new(VercelProvider::new(client.clone(), settings.vercel_oauth().cloned())),
            Arc::new(NetlifyProvider::new(
                client.clone(),
                settings.netlify_oauth().cloned(),
            )),
            Arc::new(CloudflarePagesProvider::new(client)),
        ])
    }

    /// Resolves the adapter for a platform.
    ///
    /// Returns `None` when no adapter was bound, which only happens for
    /// hand-built registries in tests.
    #[must_use]
    pub fn get(&self, platform: Platform) -> Option<Arc<dyn HostingProvider>> {
        self.providers.get(&platform).cloned()
    }

    /// Returns the platforms with a bound adapter, in display order.
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        ALL_PLATFORMS
            .into_iter()
            .filter(|platform| self.providers.contains_key(platform))
            .collect()
    }
}

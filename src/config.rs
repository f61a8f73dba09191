//! Environment-supplied configuration for platform integrations.
//!
//! OAuth client credentials, webhook signing secrets, and callback URLs are
//! injected at startup; nothing here is hardcoded into the adapters.

use crate::hosting::domain::Platform;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// OAuth application credentials registered with a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthClientConfig {
    client_id: String,
    client_secret: String,
}

impl OAuthClientConfig {
    /// Creates OAuth client credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns the OAuth client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required environment variable {0}")]
    MissingVariable(&'static str),
}

/// Per-platform integration settings, injected at process startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSettings {
    base_url: String,
    settings_url: String,
    vercel_oauth: Option<OAuthClientConfig>,
    netlify_oauth: Option<OAuthClientConfig>,
    webhook_secrets: HashMap<Platform, String>,
}

impl PlatformSettings {
    /// Creates settings with the application base URL.
    ///
    /// The OAuth outcome redirect defaults to `{base_url}/settings/deployment`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let settings_url = format!("{}/settings/deployment", base.trim_end_matches('/'));
        Self {
            base_url: base,
            settings_url,
            vercel_oauth: None,
            netlify_oauth: None,
            webhook_secrets: HashMap::new(),
        }
    }

    /// Reads settings from the process environment.
    ///
    /// `APP_BASE_URL` is required. `VERCEL_CLIENT_ID`/`VERCEL_CLIENT_SECRET`,
    /// `NETLIFY_CLIENT_ID`/`NETLIFY_CLIENT_SECRET` and the per-platform
    /// `*_WEBHOOK_SECRET` variables are optional; absent integrations stay
    /// unconfigured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] when `APP_BASE_URL` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            read_var("APP_BASE_URL").ok_or(ConfigError::MissingVariable("APP_BASE_URL"))?;
        let mut settings = Self::new(base_url);

        if let Some(url) = read_var("SETTINGS_URL") {
            settings.settings_url = url;
        }
        if let (Some(id), Some(secret)) =
            (read_var("VERCEL_CLIENT_ID"), read_var("VERCEL_CLIENT_SECRET"))
        {
            settings.vercel_oauth = Some(OAuthClientConfig::new(id, secret));
        }
        if let (Some(id), Some(secret)) = (
            read_var("NETLIFY_CLIENT_ID"),
            read_var("NETLIFY_CLIENT_SECRET"),
        ) {
            settings.netlify_oauth = Some(OAuthClientConfig::new(id, secret));
        }

        let secret_vars = [
            (Platform::GithubPages, "GITHUB_PAGES_WEBHOOK_SECRET"),
            (Platform::Vercel, "VERCEL_WEBHOOK_SECRET"),
            (Platform::Netlify, "NETLIFY_WEBHOOK_SECRET"),
            (Platform::CloudflarePages, "CLOUDFLARE_WEBHOOK_SECRET"),
        ];
        for (platform, var) in secret_vars {
            if let Some(secret) = read_var(var) {
                settings.webhook_secrets.insert(platform, secret);
            }
        }

        Ok(settings)
    }

    /// Sets the OAuth outcome redirect URL.
    #[must_use]
    pub fn with_settings_url(mut self, url: impl Into<String>) -> Self {
        self.settings_url = url.into();
        self
    }

    /// Sets the Vercel OAuth application credentials.
    #[must_use]
    pub fn with_vercel_oauth(mut self, config: OAuthClientConfig) -> Self {
        self.vercel_oauth = Some(config);
        self
    }

    /// Sets the Netlify OAuth application credentials.
    #[must_use]
    pub fn with_netlify_oauth(mut self, config: OAuthClientConfig) -> Self {
        self.netlify_oauth = Some(config);
        self
    }

    /// Sets the webhook signing secret for a platform.
    #[must_use]
    pub fn with_webhook_secret(mut self, platform: Platform, secret: impl Into<String>) -> Self {
        self.webhook_secrets.insert(platform, secret.into());
        self
    }

    /// Returns the application base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the settings page URL that OAuth outcomes redirect to.
    #[must_use]
    pub fn settings_url(&self) -> &str {
        &self.settings_url
    }

    /// Returns the OAuth callback URI for a platform.
    #[must_use]
    pub fn redirect_uri(&self, platform: Platform) -> String {
        format!(
            "{}/oauth/{}/callback",
            self.base_url.trim_end_matches('/'),
            platform
        )
    }

    /// Returns the Vercel OAuth application credentials, when configured.
    #[must_use]
    pub const fn vercel_oauth(&self) -> Option<&OAuthClientConfig> {
        self.vercel_oauth.as_ref()
    }

    /// Returns the Netlify OAuth application credentials, when configured.
    #[must_use]
    pub const fn netlify_oauth(&self) -> Option<&OAuthClientConfig> {
        self.netlify_oauth.as_ref()
    }

    /// Returns the webhook signing secret for a platform, when configured.
    #[must_use]
    pub fn webhook_secret(&self, platform: Platform) -> Option<&str> {
        self.webhook_secrets.get(&platform).map(String::as_str)
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

//! Domain types shared by the provider abstraction and its callers.

mod capabilities;
mod credentials;
mod deploy;
mod domains;
mod platform;
mod project;

pub use capabilities::PlatformCapabilities;
pub use credentials::ProviderCredentials;
pub use deploy::{AutoSetup, DeployOutcome, DeployRequest, LogEntry, LogPage, StatusReport};
pub use domains::{DnsRecord, DomainAttachment};
pub use platform::{ALL_PLATFORMS, ParsePlatformError, Platform};
pub use project::{ProjectConfig, ProjectSnapshot};

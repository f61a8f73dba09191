//! Custom-domain value objects exchanged with provider adapters.

use serde::{Deserialize, Serialize};

/// Result of attaching a custom domain on the platform side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAttachment {
    /// Whether the platform accepted the domain configuration.
    pub configured: bool,
    /// Whether the platform has already verified DNS for the domain.
    pub verified: bool,
    /// DNS records the user must create, when verification is pending.
    pub dns_records: Vec<DnsRecord>,
}

/// A DNS record the user must create for a custom domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record type (`A`, `CNAME`, `TXT`).
    pub record_type: String,
    /// Record name, relative or fully qualified as the platform states it.
    pub name: String,
    /// Record value.
    pub value: String,
}

impl DnsRecord {
    /// Creates a DNS record instruction.
    #[must_use]
    pub fn new(
        record_type: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            record_type: record_type.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

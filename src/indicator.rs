//! Indicator classification helpers.
//!
//! The enrichment endpoint is keyed by `(IOC_value, IOC_type)`; when the
//! hosting page hands over a bare value the type is inferred here. Private
//! and loopback IPv4 addresses are answered locally as clean instead of
//! being sent to the enrichment provider.

use once_cell::sync::Lazy;
use regex::Regex;

/// Indicator type as spelled in the `IOC_type` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IocType {
    IPv4,
    Hostname,
    Domain,
    Url,
    FileHash,
    Email,
}

impl IocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IocType::IPv4 => "IPv4",
            IocType::Hostname => "hostname",
            IocType::Domain => "domain",
            IocType::Url => "URL",
            IocType::FileHash => "FileHash",
            IocType::Email => "email",
        }
    }

    /// Parse the wire spelling back into a type; unknown spellings fall back
    /// to `Domain`, the broadest lookup section the provider accepts.
    pub fn parse(s: &str) -> IocType {
        match s.trim() {
            "IPv4" | "ipv4" | "ip" => IocType::IPv4,
            "hostname" => IocType::Hostname,
            "URL" | "url" => IocType::Url,
            "FileHash" | "hash" => IocType::FileHash,
            "email" => IocType::Email,
            _ => IocType::Domain,
        }
    }
}

impl std::fmt::Display for IocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static IPV4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap());

static PRIVATE_IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^127\.)|(^10\.)|(^172\.1[6-9]\.)|(^172\.2[0-9]\.)|(^172\.3[0-1]\.)|(^192\.168\.)")
        .unwrap()
});

static HASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{32,64}$").unwrap());

/// Best-effort classification of a raw indicator string.
pub fn infer_type(value: &str) -> IocType {
    let value = value.trim();
    if IPV4_RE.is_match(value) {
        IocType::IPv4
    } else if value.starts_with("http://") || value.starts_with("https://") {
        IocType::Url
    } else if HASH_RE.is_match(value) {
        IocType::FileHash
    } else if value.contains('@') {
        IocType::Email
    } else if value.matches('.').count() > 1 {
        // foo.bar.example.com style names go to the hostname section
        IocType::Hostname
    } else {
        IocType::Domain
    }
}

/// RFC1918 / loopback check. These never reach the enrichment provider.
pub fn is_private_ip(value: &str) -> bool {
    IPV4_RE.is_match(value.trim()) && PRIVATE_IPV4_RE.is_match(value.trim())
}

//! salty addresses (`user@domain`) and capability discovery.

use std::fmt::Write as _;

use {
    sha2::{Digest, Sha256},
    url::Url,
};

use crate::error::{Error, Result};

/// A salty address: `user@domain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addr {
    user: String,
    domain: String,
}

impl Addr {
    /// Parse `user@domain`. Both parts must be non-empty; extra `@` signs
    /// are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(user), Some(domain), None) if !user.is_empty() && !domain.is_empty() => {
                Ok(Self {
                    user: user.to_string(),
                    domain: domain.to_string(),
                })
            },
            _ => Err(Error::Address {
                addr: s.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Well-known discovery URL for this address.
    ///
    /// The user part is published hashed (lowercased sha256 hex), not in the
    /// clear.
    pub fn well_known_url(&self) -> Result<Url> {
        let digest = Sha256::digest(self.user.to_lowercase().as_bytes());
        let mut hash = String::with_capacity(64);
        for byte in digest {
            let _ = write!(hash, "{byte:02x}");
        }
        let url = format!("https://{}/.well-known/salty/{hash}.json", self.domain);
        Url::parse(&url).map_err(|e| Error::discovery(self, e.to_string()))
    }
}

impl std::fmt::Display for Addr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.user, self.domain)
    }
}

impl std::str::FromStr for Addr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        let addr = Addr::parse("alice@example.com").unwrap();
        assert_eq!(addr.user(), "alice");
        assert_eq!(addr.domain(), "example.com");
        assert_eq!(addr.to_string(), "alice@example.com");
    }

    #[test]
    fn parse_trims_whitespace() {
        let addr = Addr::parse("  alice@example.com ").unwrap();
        assert_eq!(addr.to_string(), "alice@example.com");
    }

    #[test]
    fn rejects_missing_parts() {
        assert!(Addr::parse("alice").is_err());
        assert!(Addr::parse("@example.com").is_err());
        assert!(Addr::parse("alice@").is_err());
        assert!(Addr::parse("").is_err());
    }

    #[test]
    fn rejects_double_at() {
        assert!(Addr::parse("alice@b@c").is_err());
    }

    #[test]
    fn well_known_url_hashes_lowercased_user() {
        let addr = Addr::parse("Alice@example.com").unwrap();
        let url = addr.well_known_url().unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        // sha256("alice")
        assert!(url.path().ends_with(
            "/2bd806c97f0e00af1a1fc3328fa763a9269723c8db8fac4f93af71db186d6e90.json"
        ));
        assert!(url.path().starts_with("/.well-known/salty/"));
    }
}

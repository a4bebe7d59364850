//! Identity key file loading.
//!
//! A salty identity file is plain text: `#`-prefixed comment lines, one of
//! which carries the owner's address (`# user: name@domain`), and a single
//! non-comment line holding the private key material.

use std::path::Path;

use secrecy::Secret;

use crate::{
    addr::Addr,
    error::{Error, Result},
};

/// A loaded salty identity: the owner's address plus key material.
pub struct Identity {
    addr: Addr,
    key: Secret<String>,
}

impl Identity {
    /// Load and parse the identity file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::IdentityRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse identity file contents.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut addr = None;
        let mut key = None;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if let Some(user) = comment.trim().strip_prefix("user:") {
                    addr = Some(Addr::parse(user)?);
                }
                continue;
            }
            if key.is_none() {
                key = Some(Secret::new(line.to_string()));
            }
        }

        let addr = addr.ok_or_else(|| Error::invalid_identity("missing `# user:` line"))?;
        let key = key.ok_or_else(|| Error::invalid_identity("missing key line"))?;
        Ok(Self { addr, key })
    }

    #[must_use]
    pub fn addr(&self) -> &Addr {
        &self.addr
    }

    #[must_use]
    pub fn key(&self) -> &Secret<String> {
        &self.key
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("addr", &self.addr)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret, std::io::Write};

    const FILE: &str = "\
# this is a salty identity file
# user: alice@example.com
kex1deadbeefdeadbeefdeadbeefdeadbeef
";

    #[test]
    fn parse_address_and_key() {
        let identity = Identity::parse(FILE).unwrap();
        assert_eq!(identity.addr().to_string(), "alice@example.com");
        assert_eq!(
            identity.key().expose_secret(),
            "kex1deadbeefdeadbeefdeadbeefdeadbeef"
        );
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = Identity::parse("# user: alice@example.com\n").unwrap_err();
        assert!(matches!(err, Error::InvalidIdentity { .. }));
    }

    #[test]
    fn missing_user_is_an_error() {
        let err = Identity::parse("kex1deadbeef\n").unwrap_err();
        assert!(matches!(err, Error::InvalidIdentity { .. }));
    }

    #[test]
    fn malformed_address_is_an_error() {
        let err = Identity::parse("# user: not-an-address\nkex1deadbeef\n").unwrap_err();
        assert!(matches!(err, Error::Address { .. }));
    }

    #[test]
    fn first_key_line_wins() {
        let identity = Identity::parse("# user: a@b\nfirst\nsecond\n").unwrap();
        assert_eq!(identity.key().expose_secret(), "first");
    }

    #[test]
    fn debug_redacts_key_material() {
        let identity = Identity::parse(FILE).unwrap();
        let debug = format!("{identity:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("kex1"));
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FILE.as_bytes()).unwrap();
        let identity = Identity::load(file.path()).unwrap();
        assert_eq!(identity.addr().to_string(), "alice@example.com");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Identity::load(Path::new("/nonexistent/identity.key")).unwrap_err();
        assert!(matches!(err, Error::IdentityRead { .. }));
    }
}

use std::path::PathBuf;

/// Crate-wide result type for salty operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The identity key file could not be read.
    #[error("failed to read identity {}: {source}", path.display())]
    IdentityRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The identity key file is present but unusable.
    #[error("invalid identity: {message}")]
    InvalidIdentity { message: String },

    /// A salty address did not parse as `user@domain`.
    #[error("invalid salty address {addr:?}")]
    Address { addr: String },

    /// Well-known lookup for an address failed.
    #[error("address lookup failed for {addr}: {message}")]
    Discovery { addr: String, message: String },

    /// HTTP transport failure.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Websocket transport failure.
    #[error(transparent)]
    WebSocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),
}

impl Error {
    #[must_use]
    pub fn invalid_identity(message: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn discovery(addr: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Discovery {
            addr: addr.to_string(),
            message: message.into(),
        }
    }
}

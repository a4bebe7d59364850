use std::error::Error as StdError;

/// Crate-wide result type for relay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors for the core relay.
///
/// Most failures in the bridge are recovered in place (user notice plus a
/// log line) and never become an `Error`; only failures the dispatcher has
/// to report upward are represented here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Session creation failed while connecting the federated surface.
    ///
    /// Fails only the session being created, never the process; the
    /// identifier stays unknown to the registry so a later event retries.
    #[error("session setup failed: {context}: {source}")]
    Setup {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn setup(context: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Setup {
            context: context.into(),
            source: source.into(),
        }
    }
}

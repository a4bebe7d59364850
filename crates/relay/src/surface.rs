//! Collaborator traits for the two messaging surfaces.
//!
//! The relay core is transport-agnostic: the chat surface (Telegram) and the
//! federated surface (salty.im) are injected behind these traits, and tests
//! substitute in-memory fakes.

use std::sync::Arc;

use {anyhow::Result, async_trait::async_trait, tokio::sync::mpsc};

use crate::event::SessionId;

/// One raw message delivered by the federated subscription feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub text: String,
}

/// The update-driven conversational surface the end user types into.
///
/// Send operations must be safe for concurrent use: dialogue replies and the
/// background subscriber share one surface without mutual exclusion.
#[async_trait]
pub trait ChatSurface: Send + Sync {
    /// Send a text message into the given chat.
    async fn send_message(&self, session: SessionId, text: &str) -> Result<()>;

    /// Fire-and-forget rejection marker for an unauthorized chat.
    ///
    /// Best-effort: failures are the implementation's to log, there is no
    /// error channel back to the caller.
    async fn send_rejection_marker(&self, session: SessionId);
}

/// A connected, identity-bound handle to the federated surface.
#[async_trait]
pub trait FederatedClient: Send + Sync {
    /// Relay `text` to the named recipient.
    async fn send(&self, recipient: &str, text: &str) -> Result<()>;

    /// Open the long-lived subscription feed for this identity.
    ///
    /// The feed ends when the sender side is dropped; there is no explicit
    /// cancellation.
    async fn subscribe(&self) -> mpsc::Receiver<RawMessage>;
}

/// Builds one [`FederatedClient`] per session at creation time.
#[async_trait]
pub trait FederatedConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn FederatedClient>>;
}

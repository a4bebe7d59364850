//! Per-chat session state and the background relay subscriber.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    dialogue::{self, DialogueState, Effect},
    event::{InboundEvent, SessionId},
    format::format_relayed,
    surface::{ChatSurface, FederatedClient},
};

pub const SEND_FAILED_NOTICE: &str = "Send failed!";

/// One authorized chat conversation.
///
/// Owns the dialogue state and the recipient; the federated client is bound
/// at creation and never swapped. Inbound events are handled one at a time
/// (the dispatcher serializes delivery), while the subscriber spawned by
/// [`Session::open`] relays the federated feed concurrently.
pub struct Session {
    id: SessionId,
    dialogue: DialogueState,
    recipient: String,
    chat: Arc<dyn ChatSurface>,
    federated: Arc<dyn FederatedClient>,
}

impl Session {
    /// Build the session and start its relay subscriber.
    pub async fn open(
        id: SessionId,
        chat: Arc<dyn ChatSurface>,
        federated: Arc<dyn FederatedClient>,
    ) -> Self {
        spawn_subscriber(id, Arc::clone(&chat), Arc::clone(&federated)).await;
        Self {
            id,
            dialogue: DialogueState::default(),
            recipient: String::new(),
            chat,
            federated,
        }
    }

    /// Interpret one inbound event under the current dialogue state.
    pub async fn handle(&mut self, event: &InboundEvent) {
        let (next, effects) = dialogue::step(self.dialogue, &self.recipient, event.text());
        self.dialogue = next;
        for effect in effects {
            self.apply(effect).await;
        }
    }

    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    #[must_use]
    pub fn dialogue(&self) -> DialogueState {
        self.dialogue
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Reply(text) => self.reply(&text).await,
            Effect::SetRecipient(name) => self.recipient = name,
            Effect::Relay(text) => {
                if let Err(e) = self.federated.send(&self.recipient, &text).await {
                    warn!(
                        session = %self.id,
                        recipient = %self.recipient,
                        error = %e,
                        "relay send failed"
                    );
                    self.reply(SEND_FAILED_NOTICE).await;
                }
            },
        }
    }

    async fn reply(&self, text: &str) {
        if let Err(e) = self.chat.send_message(self.id, text).await {
            warn!(session = %self.id, error = %e, "chat send failed");
        }
    }
}

/// Start the background task relaying the federated feed into the chat.
///
/// Each delivered message is formatted and forwarded in delivery order. A
/// chat send failure drops that message and continues; when the feed ends
/// the task ends silently.
async fn spawn_subscriber(
    id: SessionId,
    chat: Arc<dyn ChatSurface>,
    federated: Arc<dyn FederatedClient>,
) {
    let mut feed = federated.subscribe().await;
    tokio::spawn(async move {
        while let Some(message) = feed.recv().await {
            let text = format_relayed(&message.text);
            if let Err(e) = chat.send_message(id, &text).await {
                warn!(session = %id, error = %e, "dropping relayed message, chat send failed");
            }
        }
        debug!(session = %id, "federated feed ended");
    });
}

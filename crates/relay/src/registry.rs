//! Session registry and inbound-event dispatch.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    event::{InboundEvent, SessionId},
    gate::{IdentityGate, Verdict},
    session::Session,
    surface::{ChatSurface, FederatedConnector},
};

/// Routes inbound chat events to per-chat sessions.
///
/// Sessions are created lazily on the first event for an unknown identifier
/// that passes the gate. Rejected identifiers are remembered for the process
/// lifetime and dropped silently afterwards. Event delivery is serialized
/// per dispatcher (`dispatch` takes `&mut self`); only the per-session
/// subscriber tasks run concurrently with it.
pub struct Dispatcher {
    gate: IdentityGate,
    chat: Arc<dyn ChatSurface>,
    connector: Arc<dyn FederatedConnector>,
    sessions: HashMap<SessionId, Session>,
    denied: HashSet<SessionId>,
}

impl Dispatcher {
    pub fn new(
        gate: IdentityGate,
        chat: Arc<dyn ChatSurface>,
        connector: Arc<dyn FederatedConnector>,
    ) -> Self {
        Self {
            gate,
            chat,
            connector,
            sessions: HashMap::new(),
            denied: HashSet::new(),
        }
    }

    /// Handle one inbound event, creating the session if needed.
    ///
    /// A federated setup failure aborts only this session's creation; the
    /// identifier is not marked denied, so a later event retries.
    pub async fn dispatch(&mut self, event: InboundEvent) -> Result<()> {
        let id = event.session;

        if self.denied.contains(&id) {
            debug!(session = %id, "dropping event for denied session");
            return Ok(());
        }

        if !self.sessions.contains_key(&id) {
            match self.gate.authorize(id) {
                Verdict::Rejected => {
                    self.reject(id);
                    return Ok(());
                },
                Verdict::Authorized => {
                    let federated = self
                        .connector
                        .connect()
                        .await
                        .map_err(|e| Error::setup("federated connect", e))?;
                    let session = Session::open(id, Arc::clone(&self.chat), federated).await;
                    self.sessions.insert(id, session);
                    info!(session = %id, "session opened");
                },
            }
        }

        if let Some(session) = self.sessions.get_mut(&id) {
            session.handle(&event).await;
        }
        Ok(())
    }

    /// Record the denial, then fire the rejection marker on a detached task.
    ///
    /// Both are best-effort and order-independent; the marker has no error
    /// channel and must not hold up dispatch.
    fn reject(&mut self, id: SessionId) {
        self.denied.insert(id);
        info!(session = %id, "rejected unauthorized session");
        let chat = Arc::clone(&self.chat);
        tokio::spawn(async move {
            chat.send_rejection_marker(id).await;
        });
    }

    /// The session for `id`, if one was created.
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    #[must_use]
    pub fn is_denied(&self, id: SessionId) -> bool {
        self.denied.contains(&id)
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

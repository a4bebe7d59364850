//! Authorization gate for session creation.

use std::collections::HashSet;

use crate::event::SessionId;

/// Gate decision for a session identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authorized,
    Rejected,
}

/// Allow-list gate consulted once per unknown session identifier.
///
/// The reference deployment allows exactly one chat; the set form costs
/// nothing and keeps the contract unchanged.
#[derive(Debug, Clone)]
pub struct IdentityGate {
    allowed: HashSet<SessionId>,
}

impl IdentityGate {
    pub fn new(allowed: impl IntoIterator<Item = SessionId>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn authorize(&self, session: SessionId) -> Verdict {
        if self.allowed.contains(&session) {
            Verdict::Authorized
        } else {
            Verdict::Rejected
        }
    }
}

//! Inbound chat events and the text-extraction rule.

/// Opaque stable identifier of one chat conversation.
///
/// The relay never interprets the value; the chat surface guarantees it is
/// stable for the lifetime of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub i64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One inbound chat event.
///
/// The chat surface delivers text in one of three alternative shapes; at
/// most one is populated per event, but the extraction rule tolerates any
/// combination.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub session: SessionId,
    pub message: Option<String>,
    pub edited: Option<String>,
    pub callback: Option<String>,
}

impl InboundEvent {
    pub fn message(session: SessionId, text: impl Into<String>) -> Self {
        Self {
            session,
            message: Some(text.into()),
            edited: None,
            callback: None,
        }
    }

    pub fn edited(session: SessionId, text: impl Into<String>) -> Self {
        Self {
            session,
            message: None,
            edited: Some(text.into()),
            callback: None,
        }
    }

    pub fn callback(session: SessionId, data: impl Into<String>) -> Self {
        Self {
            session,
            message: None,
            edited: None,
            callback: Some(data.into()),
        }
    }

    /// The event's text: new message, then edit, then callback payload,
    /// whichever is present first. Absent everywhere yields `""`, which the
    /// dialogue treats like any other plain text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.message
            .as_deref()
            .or(self.edited.as_deref())
            .or(self.callback.as_deref())
            .unwrap_or("")
    }
}

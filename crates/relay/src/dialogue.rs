//! The per-session dialogue state machine.
//!
//! `step` is a pure transition function: it decides the next state and a
//! list of effects, and performs nothing itself. The session applies the
//! effects, so every branch here is unit-testable without a chat surface.

/// Command that opens the recipient dialogue.
pub const RECIPIENT_COMMAND: &str = "/recipient";

/// Command that abandons the recipient dialogue.
pub const CANCEL_COMMAND: &str = "/cancel";

pub const RECIPIENT_PROMPT: &str = "Send me the recipient name or /cancel.";
pub const NO_RECIPIENT_NOTICE: &str = "No recipient set, set one with /recipient";
pub const CANCEL_ACK: &str = "ok";

/// Interpretation rule applied to the next inbound event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogueState {
    /// Forward text to the recipient (or nag about setting one).
    #[default]
    Idle,
    /// The next text names the new recipient.
    AwaitingRecipient,
}

/// Side effect requested by a transition, applied by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a reply into the chat.
    Reply(String),
    /// Relay text to the currently configured recipient.
    Relay(String),
    /// Reassign the session's recipient.
    SetRecipient(String),
}

/// Interpret one inbound text under the current state.
///
/// Exactly one state's rules apply per event; `recipient` is only read
/// (reassignment happens through [`Effect::SetRecipient`]).
#[must_use]
pub fn step(state: DialogueState, recipient: &str, text: &str) -> (DialogueState, Vec<Effect>) {
    match state {
        DialogueState::Idle if text.starts_with(RECIPIENT_COMMAND) => (
            DialogueState::AwaitingRecipient,
            vec![Effect::Reply(RECIPIENT_PROMPT.into())],
        ),
        DialogueState::Idle if !recipient.is_empty() => {
            (DialogueState::Idle, vec![Effect::Relay(text.to_string())])
        },
        DialogueState::Idle => (
            DialogueState::Idle,
            vec![Effect::Reply(NO_RECIPIENT_NOTICE.into())],
        ),
        DialogueState::AwaitingRecipient if text.starts_with(CANCEL_COMMAND) => {
            (DialogueState::Idle, vec![Effect::Reply(CANCEL_ACK.into())])
        },
        DialogueState::AwaitingRecipient => {
            let name = text.trim().to_string();
            let confirmation = format!("Recipient set as {name:?}");
            (
                DialogueState::Idle,
                vec![Effect::SetRecipient(name), Effect::Reply(confirmation)],
            )
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_command_opens_dialogue() {
        let (next, effects) = step(DialogueState::Idle, "", "/recipient");
        assert_eq!(next, DialogueState::AwaitingRecipient);
        assert_eq!(effects, vec![Effect::Reply(RECIPIENT_PROMPT.into())]);
    }

    #[test]
    fn recipient_command_matches_by_prefix() {
        let (next, _) = step(DialogueState::Idle, "alice", "/recipient bob");
        assert_eq!(next, DialogueState::AwaitingRecipient);
    }

    #[test]
    fn idle_with_recipient_relays_verbatim() {
        let (next, effects) = step(DialogueState::Idle, "alice", "hello  ");
        assert_eq!(next, DialogueState::Idle);
        assert_eq!(effects, vec![Effect::Relay("hello  ".into())]);
    }

    #[test]
    fn idle_without_recipient_nags() {
        let (next, effects) = step(DialogueState::Idle, "", "hello");
        assert_eq!(next, DialogueState::Idle);
        assert_eq!(effects, vec![Effect::Reply(NO_RECIPIENT_NOTICE.into())]);
    }

    #[test]
    fn empty_text_without_recipient_nags_too() {
        let (_, effects) = step(DialogueState::Idle, "", "");
        assert_eq!(effects, vec![Effect::Reply(NO_RECIPIENT_NOTICE.into())]);
    }

    #[test]
    fn cancel_returns_to_idle_without_mutation() {
        let (next, effects) = step(DialogueState::AwaitingRecipient, "alice", "/cancel");
        assert_eq!(next, DialogueState::Idle);
        assert_eq!(effects, vec![Effect::Reply(CANCEL_ACK.into())]);
    }

    #[test]
    fn awaiting_sets_trimmed_recipient_and_confirms() {
        let (next, effects) = step(DialogueState::AwaitingRecipient, "", "  bob@example.com ");
        assert_eq!(next, DialogueState::Idle);
        assert_eq!(
            effects,
            vec![
                Effect::SetRecipient("bob@example.com".into()),
                Effect::Reply("Recipient set as \"bob@example.com\"".into()),
            ]
        );
    }

    #[test]
    fn awaiting_treats_other_commands_as_names() {
        // Only /cancel is special while awaiting a recipient.
        let (next, effects) = step(DialogueState::AwaitingRecipient, "", "/recipient");
        assert_eq!(next, DialogueState::Idle);
        assert_eq!(effects[0], Effect::SetRecipient("/recipient".into()));
    }
}

//! Inbound update intake over manual `getUpdates` long polling.

use std::time::Duration;

use {
    teloxide::{
        prelude::*,
        types::{AllowedUpdate, BotCommand, Update, UpdateKind},
    },
    tracing::{debug, error, warn},
};

use saltygram_relay::{Dispatcher, InboundEvent, SessionId};

/// Long-poll timeout requested from Telegram, in seconds.
const POLL_TIMEOUT_SECS: u32 = 30;

/// Pause after a failed poll before retrying.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Register the bridge's slash commands for autocomplete in Telegram clients.
///
/// Registration failure is not fatal; the commands still work untyped.
pub async fn register_commands(bot: &Bot) {
    let commands = vec![BotCommand::new(
        "recipient",
        "Set the recipient the bot will send messages to.",
    )];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!(error = %e, "failed to register bot commands");
    }
}

/// Run the intake loop, delivering inbound events to the dispatcher.
///
/// Never returns: poll failures are logged and retried after a fixed delay,
/// and dispatch failures (session setup) are logged per event. Events are
/// delivered one at a time, so per-session handling stays serialized.
pub async fn run(bot: Bot, mut dispatcher: Dispatcher) {
    register_commands(&bot).await;

    let mut offset: i32 = 0;
    loop {
        let result = bot
            .get_updates()
            .offset(offset)
            .timeout(POLL_TIMEOUT_SECS)
            .allowed_updates(vec![
                AllowedUpdate::Message,
                AllowedUpdate::EditedMessage,
                AllowedUpdate::CallbackQuery,
            ])
            .await;

        let updates = match result {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "getUpdates failed, retrying");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            },
        };

        for update in updates {
            offset = update.id.as_offset();
            let Some(event) = inbound_event(update) else {
                continue;
            };
            let session = event.session;
            if let Err(e) = dispatcher.dispatch(event).await {
                error!(session = %session, error = %e, "failed to handle update");
            }
        }
    }
}

/// Convert a Telegram update into a relay inbound event.
///
/// Non-text messages map to an empty message text (the dialogue treats that
/// like any other plain text); update kinds outside the allowed set yield
/// nothing.
fn inbound_event(update: Update) -> Option<InboundEvent> {
    match update.kind {
        UpdateKind::Message(msg) => Some(InboundEvent::message(
            SessionId(msg.chat.id.0),
            msg.text().unwrap_or_default(),
        )),
        UpdateKind::EditedMessage(msg) => Some(InboundEvent::edited(
            SessionId(msg.chat.id.0),
            msg.text().unwrap_or_default(),
        )),
        UpdateKind::CallbackQuery(query) => {
            let chat_id = query.message.as_ref().map(|m| m.chat().id.0)?;
            Some(InboundEvent::callback(
                SessionId(chat_id),
                query.data.unwrap_or_default(),
            ))
        },
        other => {
            debug!("ignoring unsupported update kind: {other:?}");
            None
        },
    }
}

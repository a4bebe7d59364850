//! Outbound message sending into Telegram chats.

use {
    anyhow::Result,
    async_trait::async_trait,
    teloxide::{
        prelude::*,
        types::{ChatId, InputFile},
    },
    tracing::debug,
};

use saltygram_relay::{ChatSurface, SessionId};

/// Sticker sent to unauthorized chats instead of a reply.
pub const REJECTION_STICKER: &str =
    "CAACAgIAAxkBAAEH8aZj_s6gLC33wJViUxYshH4XthTuWgACHgADr8ZRGtsCxVn3qdEpLgQ";

/// Telegram implementation of the relay's chat surface.
///
/// One bot handle serves every session; teloxide requests are safe for
/// concurrent use, so dialogue replies and subscriber relays share it
/// without locking.
pub struct TelegramSurface {
    bot: Bot,
    rejection_sticker: String,
}

impl TelegramSurface {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            rejection_sticker: REJECTION_STICKER.to_string(),
        }
    }

    #[must_use]
    pub fn with_rejection_sticker(mut self, file_id: impl Into<String>) -> Self {
        self.rejection_sticker = file_id.into();
        self
    }
}

#[async_trait]
impl ChatSurface for TelegramSurface {
    async fn send_message(&self, session: SessionId, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(session.0), text).await?;
        Ok(())
    }

    async fn send_rejection_marker(&self, session: SessionId) {
        let sticker = InputFile::file_id(self.rejection_sticker.clone());
        if let Err(e) = self.bot.send_sticker(ChatId(session.0), sticker).await {
            debug!(session = %session, error = %e, "rejection sticker send failed");
        }
    }
}

//! Telegram chat surface for the bridge.
//!
//! Implements the relay's `ChatSurface` using the teloxide library and runs
//! the inbound intake loop over manual `getUpdates` long polling.

pub mod intake;
pub mod outbound;

pub use outbound::TelegramSurface;

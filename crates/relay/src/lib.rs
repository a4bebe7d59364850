//! Core session bridge between a chat surface and a federated messaging
//! surface.
//!
//! Each authorized chat owns one [`Session`]: a small dialogue state machine
//! for picking the outbound recipient, plus a background subscriber that
//! relays inbound federated messages back into the chat. The surfaces
//! themselves (Telegram, salty.im) live behind the traits in [`surface`] and
//! are implemented by sibling crates.

pub mod dialogue;
pub mod error;
pub mod event;
pub mod format;
pub mod gate;
pub mod registry;
pub mod session;
pub mod surface;

pub use {
    dialogue::{DialogueState, Effect},
    error::{Error, Result},
    event::{InboundEvent, SessionId},
    format::format_relayed,
    gate::{IdentityGate, Verdict},
    registry::Dispatcher,
    session::Session,
    surface::{ChatSurface, FederatedClient, FederatedConnector, RawMessage},
};

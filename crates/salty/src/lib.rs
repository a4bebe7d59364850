//! salty.im collaborator for the bridge.
//!
//! Implements the relay's `FederatedClient`/`FederatedConnector` traits:
//! identity loading from a key file, recipient discovery through the
//! well-known address endpoint, sends over HTTPS and a long-lived inbox
//! subscription over websocket. Deliberately thin — protocol internals
//! beyond what the bridge needs are out of scope.

pub mod addr;
pub mod client;
pub mod error;
pub mod identity;

pub use {
    addr::Addr,
    client::{SaltyClient, SaltyConnector},
    error::{Error, Result},
    identity::Identity,
};

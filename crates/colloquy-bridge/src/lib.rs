//! Event bridge and response dispatcher for elicitation coordination.
//!
//! This crate wires the two external surfaces onto the session store:
//!
//! - [`EventBridge`] subscribes to inbound peer elicitation notifications
//!   and inbound human decisions, translating each into a call against the
//!   [`SessionStore`](colloquy_session::SessionStore).
//! - [`ResponseSink`] is the seam through which exactly one terminal
//!   decision per request id travels back to the peer-connection layer.
//!
//! The bridge owns no session state of its own. Its subscriptions are
//! established exactly once (the channel receivers are moved into
//! [`EventBridge::spawn`]) and torn down exactly once, so it can never act
//! on a notification after the owning store has been torn down.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod bridge;
mod dispatch;

pub use bridge::{BridgeHandle, EventBridge, FormSubmission};
pub use dispatch::ResponseSink;

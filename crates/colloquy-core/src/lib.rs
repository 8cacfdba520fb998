//! Core types for MCP elicitation coordination.
//!
//! An *elicitation* is a server-initiated, human-in-the-loop request for
//! structured input mid-protocol. This crate holds the pieces every layer
//! shares:
//!
//! - [`ElicitationRequest`] / [`ElicitationDecision`] — the wire-facing
//!   request and the terminal human verdict (accept, decline, or cancel)
//! - [`form`] — the pure schema form model: [`derive_fields`] and [`coerce`]
//! - [`ElicitationError`] — shared error type
//!
//! Session state and event plumbing live in the `colloquy-session` and
//! `colloquy-bridge` crates.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod form;
pub mod types;

/// Prelude re-exports for convenient use.
pub mod prelude {
    pub use crate::error::{ElicitationError, ElicitationResult};
    pub use crate::form::{FieldDescriptor, FieldKind, coerce, derive_fields};
    pub use crate::types::{ElicitAction, ElicitationDecision, ElicitationRequest};
}

// Re-export key types at crate root for convenience.
pub use error::{ElicitationError, ElicitationResult};
pub use form::{FieldDescriptor, FieldKind, coerce, derive_fields};
pub use types::{ElicitAction, ElicitationDecision, ElicitationRequest};

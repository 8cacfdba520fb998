//! Elicitation session store.
//!
//! A [`SessionStore`] owns the process-wide elicitation state: at most one
//! active request, a FIFO backlog of requests that arrived while a session
//! was already open, and the suspended awaiters expecting a decision. The
//! store is the only shared mutable resource in the coordination core and is
//! mutated exclusively through its four operations:
//!
//! - [`SessionStore::submit_request`] — open a session or join the backlog
//! - [`SessionStore::resolve_active`] — deliver the human's verdict
//! - [`SessionStore::teardown`] — cancel everything outstanding
//! - [`SessionStore::active_form`] — read-only snapshot for rendering
//!
//! # Example
//!
//! ```rust
//! use colloquy_core::ElicitationDecision;
//! use colloquy_core::ElicitationRequest;
//! use colloquy_session::SessionStore;
//!
//! # async fn example() -> colloquy_core::ElicitationResult<()> {
//! let store = SessionStore::new();
//! let verdict = store.submit_request(ElicitationRequest::new("demo", "Proceed?"))?;
//! store.resolve_active(ElicitationDecision::decline())?;
//! assert!(!verdict.await.is_accept());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod store;

pub use store::{ActiveForm, DecisionFuture, SessionStore};

//! Error types for the elicitation coordination core.
//!
//! Schema problems are deliberately not represented here: the form model
//! degrades on malformed fragments and numeric coercion falls back to zero,
//! so neither can fail. Errors below are raised synchronously, never inside
//! a suspended decision future.

/// Errors from the elicitation coordination core.
#[derive(Debug, thiserror::Error)]
pub enum ElicitationError {
    /// A new request reused an id that is still active or queued. This is a
    /// protocol violation; the offending request is rejected without
    /// mutating session state.
    #[error("duplicate elicitation request id: {id}")]
    DuplicateRequestId {
        /// The offending request id.
        id: String,
    },

    /// A decision arrived while no elicitation session was open.
    #[error("no active elicitation request")]
    NoActiveRequest,

    /// The peer-connection layer failed to deliver a finalized decision.
    /// The decision is locally final regardless; only the network send may
    /// be retried, and that is the peer layer's concern.
    #[error("failed to deliver decision for request {id}: {reason}")]
    Dispatch {
        /// Id of the request whose decision could not be delivered.
        id: String,
        /// Transport-level failure description.
        reason: String,
    },
}

/// Result type for elicitation operations.
pub type ElicitationResult<T> = Result<T, ElicitationError>;

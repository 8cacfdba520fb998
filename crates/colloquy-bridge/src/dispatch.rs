//! Response dispatcher seam toward the peer-connection layer.

use async_trait::async_trait;

use colloquy_core::{ElicitationDecision, ElicitationResult};

/// Transport seam through which finalized decisions reach the peer.
///
/// Implementations forward a decision, keyed by request id, to whatever
/// peer-connection layer produced the elicitation. Each request id is
/// delivered at most once: the session store resolves every awaiter exactly
/// once, and the bridge dispatches only from awaiter resolution.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use colloquy_bridge::ResponseSink;
/// use colloquy_core::{ElicitationDecision, ElicitationResult};
///
/// struct LoggingSink;
///
/// #[async_trait]
/// impl ResponseSink for LoggingSink {
///     async fn deliver(
///         &self,
///         request_id: &str,
///         decision: ElicitationDecision,
///     ) -> ElicitationResult<()> {
///         println!("{request_id}: {:?}", decision.action);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// Deliver the terminal decision for `request_id`.
    ///
    /// A failed delivery ([`ElicitationError::Dispatch`]) is non-fatal: the
    /// decision is already locally final, so an implementation may retry the
    /// network send but must never re-ask the human.
    ///
    /// [`ElicitationError::Dispatch`]: colloquy_core::ElicitationError::Dispatch
    async fn deliver(
        &self,
        request_id: &str,
        decision: ElicitationDecision,
    ) -> ElicitationResult<()>;
}

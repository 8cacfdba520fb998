//! The session store state machine.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;

use colloquy_core::{
    ElicitationDecision, ElicitationError, ElicitationRequest, ElicitationResult, FieldDescriptor,
    derive_fields,
};

/// An outstanding request together with the channel its decision travels on.
struct Awaiter {
    request: ElicitationRequest,
    tx: oneshot::Sender<ElicitationDecision>,
}

/// Owned session state. Guarded as a whole so every transition is atomic.
#[derive(Default)]
struct SessionState {
    /// The request currently awaiting a decision, if any.
    active: Option<Awaiter>,
    /// Requests received while a session was already open, FIFO.
    queue: VecDeque<Awaiter>,
}

impl SessionState {
    fn contains_id(&self, id: &str) -> bool {
        self.active.as_ref().is_some_and(|w| w.request.id == id)
            || self.queue.iter().any(|w| w.request.id == id)
    }
}

/// Read-only snapshot of the active elicitation, shaped for rendering.
///
/// The rendering surface observes this snapshot and calls back into the
/// store (via the bridge) to submit a decision; it never mutates session
/// state directly.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveForm {
    /// Id of the active request.
    pub id: String,
    /// Origin server name.
    pub server: String,
    /// Prompt message to display. May contain markup.
    pub message: String,
    /// Derived field descriptors, in schema declaration order.
    pub fields: Vec<FieldDescriptor>,
    /// The raw schema, kept for coercing the eventual submission.
    pub requested_schema: Value,
}

/// Future resolving to the terminal decision for a submitted request.
///
/// Resolves with exactly the decision passed to the `resolve_active` call
/// that serviced the request, or with a synthesized cancel if the store is
/// torn down or dropped first. It is never left dangling.
#[derive(Debug)]
pub struct DecisionFuture {
    rx: oneshot::Receiver<ElicitationDecision>,
}

impl Future for DecisionFuture {
    type Output = ElicitationDecision;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(decision)) => Poll::Ready(decision),
            // Sender dropped without a decision: the store itself went away.
            Poll::Ready(Err(_)) => Poll::Ready(ElicitationDecision::cancel()),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Process-wide elicitation session store.
///
/// Holds at most one active request plus a FIFO backlog of requests that
/// arrived while a session was already open. Exactly one store exists per
/// process (or per UI root); it is explicitly constructed and passed by
/// reference, never ambient global state.
///
/// All operations return errors synchronously. The only suspension point in
/// the core is awaiting the [`DecisionFuture`] returned by
/// [`submit_request`](Self::submit_request). There is no built-in timeout: a
/// caller that wants one races the future against its own timer and resolves
/// a cancel itself to keep the state machine consistent.
#[derive(Default)]
pub struct SessionStore {
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// Create a new, idle store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit a peer-originated request and obtain its decision future.
    ///
    /// If the store is idle the request becomes active immediately;
    /// otherwise it joins the backlog and its future resolves only once it
    /// has been promoted and decided.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::DuplicateRequestId`] if the id matches the active
    /// request or any queued one; state is left untouched.
    pub fn submit_request(
        &self,
        request: ElicitationRequest,
    ) -> ElicitationResult<DecisionFuture> {
        let mut state = self.lock();
        if state.contains_id(&request.id) {
            return Err(ElicitationError::DuplicateRequestId { id: request.id });
        }

        let (tx, rx) = oneshot::channel();
        let awaiter = Awaiter { request, tx };
        if state.active.is_none() {
            debug!(id = %awaiter.request.id, server = %awaiter.request.server, "elicitation opened");
            state.active = Some(awaiter);
        } else {
            debug!(
                id = %awaiter.request.id,
                queued = state.queue.len(),
                "elicitation queued behind active request"
            );
            state.queue.push_back(awaiter);
        }
        Ok(DecisionFuture { rx })
    }

    /// Resolve the active request with the given decision.
    ///
    /// The head of the backlog, if any, is promoted under the same lock, so
    /// no idle state is observable between one request's decision and the
    /// next request becoming active. Returns the request that was serviced.
    ///
    /// # Errors
    ///
    /// [`ElicitationError::NoActiveRequest`] if the store is idle.
    pub fn resolve_active(
        &self,
        decision: ElicitationDecision,
    ) -> ElicitationResult<ElicitationRequest> {
        let waiter = {
            let mut state = self.lock();
            let Some(waiter) = state.active.take() else {
                return Err(ElicitationError::NoActiveRequest);
            };
            state.active = state.queue.pop_front();
            waiter
        };
        debug!(id = %waiter.request.id, action = ?decision.action, "elicitation resolved");
        // A dropped receiver means nobody awaits the verdict anymore; the
        // decision is locally final either way.
        let _ = waiter.tx.send(decision);
        Ok(waiter.request)
    }

    /// Force-close the session, cancelling the active request and every
    /// queued one. Every outstanding future resolves with a cancel decision
    /// before this returns. Idempotent when already idle.
    pub fn teardown(&self) {
        let (active, queued) = {
            let mut state = self.lock();
            (state.active.take(), std::mem::take(&mut state.queue))
        };
        let mut cancelled = 0_usize;
        for waiter in active.into_iter().chain(queued) {
            let _ = waiter.tx.send(ElicitationDecision::cancel());
            cancelled = cancelled.saturating_add(1);
        }
        if cancelled > 0 {
            debug!(cancelled, "elicitation session torn down");
        }
    }

    /// Snapshot of the active request for the rendering surface.
    #[must_use]
    pub fn active_form(&self) -> Option<ActiveForm> {
        let state = self.lock();
        state.active.as_ref().map(|waiter| ActiveForm {
            id: waiter.request.id.clone(),
            server: waiter.request.server.clone(),
            message: waiter.request.message.clone(),
            fields: derive_fields(&waiter.request.requested_schema),
            requested_schema: waiter.request.requested_schema.clone(),
        })
    }

    /// Whether a request is currently awaiting a decision.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().active.is_some()
    }

    /// Number of requests waiting behind the active one.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.lock().queue.len()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SessionStore")
            .field("open", &state.active.is_some())
            .field("queued", &state.queue.len())
            .finish()
    }
}

//! The event bridge task.

use std::collections::HashMap;
use std::sync::Arc;

use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesOrdered;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use colloquy_core::{ElicitAction, ElicitationDecision, ElicitationRequest, coerce};
use colloquy_session::SessionStore;

use crate::dispatch::ResponseSink;

/// A raw decision produced by the human-facing surface.
///
/// `raw_values` is the only representation a plain text/checkbox/select
/// surface can produce; the bridge coerces it against the active request's
/// schema before it reaches the session store. A window closed without an
/// explicit choice arrives as [`ElicitAction::Cancel`], exactly like the
/// cancel button.
#[derive(Debug, Clone)]
pub struct FormSubmission {
    /// The action taken by the user.
    pub action: ElicitAction,
    /// Raw string-keyed form values. Meaningful only for accept.
    pub raw_values: HashMap<String, String>,
}

impl FormSubmission {
    /// An accept submission carrying the surface's raw field values.
    #[must_use]
    pub fn accept(raw_values: HashMap<String, String>) -> Self {
        Self {
            action: ElicitAction::Accept,
            raw_values,
        }
    }

    /// A decline submission.
    #[must_use]
    pub fn decline() -> Self {
        Self {
            action: ElicitAction::Decline,
            raw_values: HashMap::new(),
        }
    }

    /// A cancel submission (explicit cancel or window close).
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            action: ElicitAction::Cancel,
            raw_values: HashMap::new(),
        }
    }
}

/// Handle to a running [`EventBridge`] task.
///
/// Dropping the handle does not stop the bridge; call
/// [`shutdown`](Self::shutdown) (idempotent) and then
/// [`join`](Self::join) to wait for the final cancel flush.
pub struct BridgeHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl BridgeHandle {
    /// Request shutdown. Safe to call any number of times.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Wait for the bridge task to finish. After this returns, the store
    /// has been torn down and every outstanding cancel has been offered to
    /// the sink; the bridge will never act on another notification.
    pub async fn join(self) {
        let _ = self.task.await;
    }

    /// Convenience: [`shutdown`](Self::shutdown) followed by
    /// [`join`](Self::join).
    pub async fn close(self) {
        self.shutdown();
        self.join().await;
    }
}

impl std::fmt::Debug for BridgeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeHandle")
            .field("shutdown", &self.shutdown.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Bridges inbound elicitation events onto the session store.
///
/// The bridge consumes two streams: peer-originated
/// [`ElicitationRequest`] notifications and human [`FormSubmission`]
/// decisions. Each peer request is submitted to the store and its decision
/// future queued for ordered delivery; each submission is coerced against
/// the active schema and resolved. Because the receivers are moved into
/// [`spawn`](Self::spawn), the subscription exists exactly once per bridge
/// lifetime — a duplicate subscription is unrepresentable.
pub struct EventBridge;

impl EventBridge {
    /// Spawn the bridge task on the current tokio runtime.
    ///
    /// The task runs until [`BridgeHandle::shutdown`] is called or either
    /// inbound stream closes. On exit it tears down the store and flushes
    /// the resulting cancel decisions to the sink, so no request id is ever
    /// left without its terminal response.
    #[must_use]
    pub fn spawn(
        store: Arc<SessionStore>,
        sink: Arc<dyn ResponseSink>,
        peer_rx: mpsc::Receiver<ElicitationRequest>,
        decision_rx: mpsc::Receiver<FormSubmission>,
    ) -> BridgeHandle {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let task = tokio::spawn(run(store, sink, peer_rx, decision_rx, token));
        BridgeHandle { shutdown, task }
    }
}

/// A decision future tagged with its request id, boxed for the ordered
/// delivery queue.
type Delivery = BoxFuture<'static, (String, ElicitationDecision)>;

async fn run(
    store: Arc<SessionStore>,
    sink: Arc<dyn ResponseSink>,
    mut peer_rx: mpsc::Receiver<ElicitationRequest>,
    mut decision_rx: mpsc::Receiver<FormSubmission>,
    token: CancellationToken,
) {
    // Decision futures resolve in FIFO activation order, and FuturesOrdered
    // yields in insertion order, so deliveries leave in the same order the
    // requests became active.
    let mut deliveries: FuturesOrdered<Delivery> = FuturesOrdered::new();

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            event = peer_rx.recv() => match event {
                Some(request) => submit(&store, &mut deliveries, request),
                None => break,
            },
            submission = decision_rx.recv() => match submission {
                Some(submission) => resolve(&store, submission),
                None => break,
            },
            Some((id, decision)) = deliveries.next(), if !deliveries.is_empty() => {
                deliver(sink.as_ref(), &id, decision).await;
            }
        }
    }

    // Teardown resolves every outstanding awaiter with a cancel; flush those
    // to the peer before the task exits.
    store.teardown();
    while let Some((id, decision)) = deliveries.next().await {
        deliver(sink.as_ref(), &id, decision).await;
    }
    debug!("event bridge stopped");
}

fn submit(
    store: &SessionStore,
    deliveries: &mut FuturesOrdered<Delivery>,
    request: ElicitationRequest,
) {
    let id = request.id.clone();
    match store.submit_request(request) {
        Ok(future) => {
            deliveries.push_back(Box::pin(async move { (id, future.await) }));
        },
        // Protocol violation: surface to the operator, drop the request.
        Err(e) => error!(%id, "rejected elicitation request: {e}"),
    }
}

fn resolve(store: &SessionStore, submission: FormSubmission) {
    let decision = match submission.action {
        ElicitAction::Accept => {
            let Some(form) = store.active_form() else {
                warn!("dropped accept decision: no active elicitation request");
                return;
            };
            ElicitationDecision::accept(coerce(&submission.raw_values, &form.requested_schema))
        },
        ElicitAction::Decline => ElicitationDecision::decline(),
        ElicitAction::Cancel => ElicitationDecision::cancel(),
    };

    if let Err(e) = store.resolve_active(decision) {
        warn!("dropped stray decision: {e}");
    }
}

async fn deliver(sink: &dyn ResponseSink, id: &str, decision: ElicitationDecision) {
    let action = decision.action;
    match sink.deliver(id, decision).await {
        Ok(()) => debug!(%id, ?action, "elicitation decision delivered"),
        // The decision is locally final; only the network send failed.
        Err(e) => warn!(%id, "failed to deliver elicitation decision: {e}"),
    }
}

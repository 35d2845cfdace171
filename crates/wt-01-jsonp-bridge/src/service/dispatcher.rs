//! Bridged remote call dispatcher.
//!
//! `dispatch` registers a callback, attaches a script node whose URL carries
//! the call, and returns a [`PendingCall`]. Four paths can settle a call:
//!
//! | Path | Trigger | Outcome |
//! |------|---------|---------|
//! | callback | script invokes the callback | data or `Application` |
//! | transport | fetch fails, or script never invokes the callback | `Transport` |
//! | timer | per-call timeout elapses | `Timeout` |
//! | cancel | [`CancelHandle::cancel`] | `Cancelled` |
//!
//! All four go through `settle`, which removes the table entry first. Only the
//! path that gets the entry continues, detaches the node, stops the other
//! tasks, and sends the result; every later attempt is a no-op.

use crate::adapters::http::HttpScriptTransport;
use crate::adapters::script::evaluate;
use crate::domain::config::BridgeConfig;
use crate::domain::correlation::CorrelationId;
use crate::domain::descriptor::CallDescriptor;
use crate::domain::document::{NodeId, ScriptDocument};
use crate::domain::envelope::RemoteEnvelope;
use crate::domain::error::{CallResult, ConfigError, RemoteCallError, CALLBACK_NOT_INVOKED};
use crate::domain::pending::{CallbackTable, DispatchStats, Settlement, StatsSnapshot};
use crate::ports::outbound::ScriptTransport;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use url::Url;

/// Dispatcher for bridged remote calls.
///
/// Cheap to clone; clones share the callback table and document.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    endpoint: Url,
    timeout: Duration,
    table: CallbackTable,
    document: ScriptDocument,
    transport: Arc<dyn ScriptTransport>,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    /// Create a dispatcher over `transport`.
    pub fn new(
        config: BridgeConfig,
        transport: Arc<dyn ScriptTransport>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let endpoint = config.endpoint()?.clone();
        let stats = Arc::new(DispatchStats::default());

        Ok(Self {
            inner: Arc::new(Inner {
                endpoint,
                timeout: config.timeout,
                table: CallbackTable::new(config.callback_prefix.clone(), Arc::clone(&stats)),
                document: ScriptDocument::new(),
                transport,
                stats,
            }),
        })
    }

    /// Create a dispatcher fetching scripts over HTTP.
    pub fn with_http(config: BridgeConfig) -> Result<Self, ConfigError> {
        let transport = Arc::new(HttpScriptTransport::new(&config)?);
        Self::new(config, transport)
    }

    /// Dispatch a call with the configured timeout.
    ///
    /// Must be called from within a tokio runtime: delivery and the timer run
    /// as spawned tasks, so the call settles even if the returned handle is
    /// dropped.
    pub fn dispatch<T: DeserializeOwned>(&self, descriptor: CallDescriptor) -> PendingCall<T> {
        self.dispatch_with_timeout(descriptor, self.inner.timeout)
    }

    /// Dispatch a call with an explicit timeout.
    pub fn dispatch_with_timeout<T: DeserializeOwned>(
        &self,
        descriptor: CallDescriptor,
        timeout: Duration,
    ) -> PendingCall<T> {
        let inner = &self.inner;
        let action = descriptor.action();

        let (correlation_id, receiver) = inner.table.register(action);
        let src = descriptor.encode_url(&inner.endpoint, &correlation_id);
        let Some(node) = inner.attach(&correlation_id, &src) else {
            return PendingCall::new(Arc::clone(inner), correlation_id, receiver);
        };

        debug!(
            correlation_id = %correlation_id,
            action = %action,
            node = %node,
            "Attached script node"
        );

        let delivery = tokio::spawn(Inner::deliver(
            Arc::clone(inner),
            correlation_id.clone(),
            node,
            src,
        ));
        inner
            .table
            .track_task(&correlation_id, delivery.abort_handle());

        let timer = tokio::spawn(Inner::expire(
            Arc::clone(inner),
            correlation_id.clone(),
            timeout,
        ));
        if !inner.table.track_task(&correlation_id, timer.abort_handle()) {
            // Delivery already settled the call.
            timer.abort();
        }

        PendingCall::new(Arc::clone(inner), correlation_id, receiver)
    }

    /// Dispatch and wait for settlement.
    pub async fn call<T: DeserializeOwned>(&self, descriptor: CallDescriptor) -> CallResult<T> {
        self.dispatch(descriptor).await
    }

    /// Invoke a callback by name, as an evaluated script does.
    ///
    /// Returns false when no call is pending under `name`.
    pub fn invoke_callback(&self, name: &str, payload: Value) -> bool {
        self.inner.invoke(name, payload)
    }

    /// Get number of calls awaiting settlement
    pub fn pending_count(&self) -> usize {
        self.inner.table.pending_count()
    }

    /// Get number of script nodes still attached
    pub fn attached_count(&self) -> usize {
        self.inner.document.len()
    }

    /// Check whether anything is left behind for `correlation_id`
    pub fn is_pending(&self, correlation_id: &CorrelationId) -> bool {
        self.inner.table.is_pending(correlation_id)
            || self.inner.document.nodes_for(correlation_id) > 0
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }
}

impl Inner {
    /// Append the delivery node and bind it to its call.
    ///
    /// Returns `None` when the call settled before the node was bound; the node
    /// is detached again and nothing is delivered.
    fn attach(&self, correlation_id: &CorrelationId, src: &Url) -> Option<NodeId> {
        let node = self.document.append(src.clone(), correlation_id.clone());
        if self.table.bind_node(correlation_id, node) {
            Some(node)
        } else {
            self.document.remove(node);
            None
        }
    }

    /// Settle a call. Returns false if another path got there first.
    fn settle(&self, correlation_id: &CorrelationId, settlement: Settlement) -> bool {
        let Some(entry) = self.table.take(correlation_id) else {
            return false;
        };

        if let Some(node) = entry.node {
            self.document.remove(node);
        }
        for task in &entry.tasks {
            task.abort();
        }

        self.stats.record(&settlement);
        let elapsed = entry.created_at.elapsed();
        match &settlement {
            Ok(_) => debug!(
                correlation_id = %correlation_id,
                action = %entry.action,
                elapsed_ms = elapsed.as_millis() as u64,
                "Call resolved"
            ),
            Err(e) => debug!(
                correlation_id = %correlation_id,
                action = %entry.action,
                elapsed_ms = elapsed.as_millis() as u64,
                kind = ?e.kind(),
                error = %e,
                "Call rejected"
            ),
        }

        if entry.sender.send(settlement).is_err() {
            debug!(
                correlation_id = %correlation_id,
                "Pending call handle dropped before settlement"
            );
        }
        true
    }

    /// The registered handler: decode the envelope and settle.
    fn invoke(&self, name: &str, payload: Value) -> bool {
        let Ok(correlation_id) = CorrelationId::parse(name) else {
            warn!(callback = name, "Invocation of invalid callback name");
            self.stats
                .total_unknown_callbacks
                .fetch_add(1, Ordering::Relaxed);
            return false;
        };

        if !self.table.is_pending(&correlation_id) {
            warn!(
                correlation_id = %correlation_id,
                "Invocation of unknown or settled callback"
            );
            self.stats
                .total_unknown_callbacks
                .fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let settlement = RemoteEnvelope::from_payload(payload).and_then(RemoteEnvelope::into_result);
        self.settle(&correlation_id, settlement)
    }

    /// Delivery task: fetch the script, evaluate it, and settle as a
    /// transport failure if that did not settle the call.
    async fn deliver(self: Arc<Self>, correlation_id: CorrelationId, node: NodeId, src: Url) {
        if !self.document.contains(node) {
            return;
        }

        match self.transport.fetch(&src).await {
            Ok(body) => {
                match evaluate(&body) {
                    Ok(invocation) => {
                        self.invoke(&invocation.callback, invocation.payload);
                    }
                    Err(e) => warn!(
                        correlation_id = %correlation_id,
                        error = %e,
                        "Script body is not a callback invocation"
                    ),
                }
                self.settle(
                    &correlation_id,
                    Err(RemoteCallError::Transport(CALLBACK_NOT_INVOKED.to_string())),
                );
            }
            Err(e) => {
                warn!(
                    correlation_id = %correlation_id,
                    error = %e,
                    "Script delivery failed"
                );
                self.settle(&correlation_id, Err(RemoteCallError::transport()));
            }
        }
    }

    /// Timer task
    async fn expire(self: Arc<Self>, correlation_id: CorrelationId, timeout: Duration) {
        tokio::time::sleep(timeout).await;
        if self.settle(&correlation_id, Err(RemoteCallError::Timeout(timeout))) {
            warn!(
                correlation_id = %correlation_id,
                timeout_ms = timeout.as_millis() as u64,
                "Call timed out"
            );
        }
    }
}

/// Settlement handle of a dispatched call.
///
/// Awaiting it yields the call's result decoded as `T`.
#[must_use = "a dispatched call settles regardless, but its result is lost unless awaited"]
pub struct PendingCall<T> {
    correlation_id: CorrelationId,
    receiver: oneshot::Receiver<Settlement>,
    cancel: CancelHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PendingCall<T> {
    fn new(
        inner: Arc<Inner>,
        correlation_id: CorrelationId,
        receiver: oneshot::Receiver<Settlement>,
    ) -> Self {
        Self {
            cancel: CancelHandle {
                inner,
                correlation_id: correlation_id.clone(),
            },
            correlation_id,
            receiver,
            _marker: PhantomData,
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Handle that can cancel this call from elsewhere
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Cancel the call. Returns false if it already settled.
    pub fn cancel(&self) -> bool {
        self.cancel.cancel()
    }
}

impl<T: DeserializeOwned> Future for PendingCall<T> {
    type Output = CallResult<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(Ok(data))) => match serde_json::from_value(data) {
                Ok(value) => Poll::Ready(Ok(value)),
                Err(e) => {
                    this.cancel.inner.stats.record_decode_failure();
                    Poll::Ready(Err(e.into()))
                }
            },
            Poll::Ready(Ok(Err(e))) => Poll::Ready(Err(e)),
            // Entry dropped without settling: the dispatcher itself is gone.
            Poll::Ready(Err(_)) => Poll::Ready(Err(RemoteCallError::Cancelled)),
        }
    }
}

/// Cancels one dispatched call.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<Inner>,
    correlation_id: CorrelationId,
}

impl CancelHandle {
    /// Settle the call as cancelled. Returns false if it already settled.
    pub fn cancel(&self) -> bool {
        let cancelled = self
            .inner
            .settle(&self.correlation_id, Err(RemoteCallError::Cancelled));
        if cancelled {
            debug!(correlation_id = %self.correlation_id, "Call cancelled");
        }
        cancelled
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }
}

//! Callback table: correlation IDs mapped to calls awaiting settlement.
//!
//! Flow:
//! 1. Dispatcher calls `register()` to draw a unique callback name and get a
//!    oneshot receiver
//! 2. Dispatcher attaches the delivery node and binds it with `bind_node()`
//! 3. Whichever path settles first calls `take()`; only that path gets the
//!    entry, so settlement happens exactly once
//! 4. The settling path detaches the node and sends on the entry's sender

use crate::domain::correlation::CorrelationId;
use crate::domain::descriptor::Action;
use crate::domain::document::NodeId;
use crate::domain::error::RemoteCallError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tracing::debug;

/// What a settled call delivers to its waiter
pub type Settlement = Result<Value, RemoteCallError>;

/// A call waiting for its callback
pub struct PendingCallback {
    /// Channel to deliver the settlement
    pub sender: oneshot::Sender<Settlement>,
    /// Delivery node, once attached
    pub node: Option<NodeId>,
    /// Action (for logging)
    pub action: Action,
    /// When the call was registered
    pub created_at: Instant,
    /// Delivery and timer tasks to stop on settlement
    pub tasks: Vec<AbortHandle>,
}

/// Counters over the lifetime of a dispatcher
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// Total calls registered
    pub total_dispatched: AtomicU64,
    /// Calls resolved with data
    pub total_succeeded: AtomicU64,
    /// Calls rejected by the remote
    pub total_failed: AtomicU64,
    /// Calls rejected by delivery failure
    pub total_transport_errors: AtomicU64,
    /// Calls rejected by their timer
    pub total_timeouts: AtomicU64,
    /// Calls cancelled by the caller
    pub total_cancelled: AtomicU64,
    /// Callback invocations with no pending call
    pub total_unknown_callbacks: AtomicU64,
}

/// Plain copy of [`DispatchStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub dispatched: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub transport_errors: u64,
    pub timeouts: u64,
    pub cancelled: u64,
    pub unknown_callbacks: u64,
}

impl DispatchStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            dispatched: self.total_dispatched.load(Ordering::Relaxed),
            succeeded: self.total_succeeded.load(Ordering::Relaxed),
            failed: self.total_failed.load(Ordering::Relaxed),
            transport_errors: self.total_transport_errors.load(Ordering::Relaxed),
            timeouts: self.total_timeouts.load(Ordering::Relaxed),
            cancelled: self.total_cancelled.load(Ordering::Relaxed),
            unknown_callbacks: self.total_unknown_callbacks.load(Ordering::Relaxed),
        }
    }

    /// Count a settlement by its outcome.
    pub fn record(&self, settlement: &Settlement) {
        let counter = match settlement {
            Ok(_) => &self.total_succeeded,
            Err(RemoteCallError::Timeout(_)) => &self.total_timeouts,
            Err(RemoteCallError::Cancelled) => &self.total_cancelled,
            Err(RemoteCallError::Transport(_)) => &self.total_transport_errors,
            Err(_) => &self.total_failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Move a resolved call to `failed` once its data fails to decode as the
    /// caller's type.
    pub fn record_decode_failure(&self) {
        self.total_succeeded.fetch_sub(1, Ordering::Relaxed);
        self.total_failed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Dispatcher-owned table of pending callbacks.
pub struct CallbackTable {
    pending: DashMap<CorrelationId, PendingCallback>,
    prefix: String,
    stats: Arc<DispatchStats>,
}

impl CallbackTable {
    pub fn new(prefix: impl Into<String>, stats: Arc<DispatchStats>) -> Self {
        Self {
            pending: DashMap::new(),
            prefix: prefix.into(),
            stats,
        }
    }

    /// Register a call under a fresh callback name.
    ///
    /// The name is re-drawn if it collides with a pending one, so it is
    /// unique among everything currently in the table.
    pub fn register(&self, action: Action) -> (CorrelationId, oneshot::Receiver<Settlement>) {
        let (correlation_id, rx) = loop {
            let candidate = CorrelationId::generate(&self.prefix);
            match self.pending.entry(candidate.clone()) {
                Entry::Occupied(_) => {
                    debug!(correlation_id = %candidate, "Callback name collision, redrawing");
                }
                Entry::Vacant(slot) => {
                    let (tx, rx) = oneshot::channel();
                    slot.insert(PendingCallback {
                        sender: tx,
                        node: None,
                        action,
                        created_at: Instant::now(),
                        tasks: Vec::new(),
                    });
                    break (candidate, rx);
                }
            }
        };

        self.stats.total_dispatched.fetch_add(1, Ordering::Relaxed);
        debug!(
            correlation_id = %correlation_id,
            action = %action,
            "Registered callback"
        );

        (correlation_id, rx)
    }

    /// Record the delivery node of a pending call.
    pub fn bind_node(&self, correlation_id: &CorrelationId, node: NodeId) -> bool {
        match self.pending.get_mut(correlation_id) {
            Some(mut entry) => {
                entry.node = Some(node);
                true
            }
            None => false,
        }
    }

    /// Attach a task to be aborted when the call settles.
    ///
    /// Returns false when the call already settled; the task is then left to
    /// finish on its own.
    pub fn track_task(&self, correlation_id: &CorrelationId, task: AbortHandle) -> bool {
        match self.pending.get_mut(correlation_id) {
            Some(mut entry) => {
                entry.tasks.push(task);
                true
            }
            None => false,
        }
    }

    /// Remove a pending call. At most one caller ever gets `Some`.
    pub fn take(&self, correlation_id: &CorrelationId) -> Option<PendingCallback> {
        self.pending.remove(correlation_id).map(|(_, entry)| entry)
    }

    /// Check if a correlation ID is pending
    pub fn is_pending(&self, correlation_id: &CorrelationId) -> bool {
        self.pending.contains_key(correlation_id)
    }

    /// Get number of currently pending calls
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Get statistics
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }
}

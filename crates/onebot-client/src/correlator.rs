//! The pending-call table.

use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::errors::CallError;

pub(crate) type CallResult = Result<Value, CallError>;

/// Correlation state for in-flight calls.
///
/// Ids come from a monotone counter starting at 1. A slot is claimed by
/// whichever side removes it first, so a response and a timeout can
/// never both resolve the same call.
#[derive(Debug, Default)]
pub(crate) struct PendingTable {
    next_echo: AtomicI64,
    slots: DashMap<i64, oneshot::Sender<CallResult>>,
}

impl PendingTable {
    /// Allocate a correlation id and the slot its result arrives in.
    pub fn register(&self) -> (i64, oneshot::Receiver<CallResult>) {
        let echo = self.next_echo.fetch_add(1, Ordering::Relaxed) + 1;
        let (tx, rx) = oneshot::channel();
        let _ = self.slots.insert(echo, tx);
        (echo, rx)
    }

    /// Deliver a result to a slot. Returns false when the slot is gone,
    /// which happens for duplicate responses and for calls that already
    /// timed out.
    pub fn resolve(&self, echo: i64, result: CallResult) -> bool {
        match self.slots.remove(&echo) {
            Some((_, tx)) => {
                let _ = tx.send(result);
                true
            }
            None => false,
        }
    }

    /// Abandon a slot. Returns false when a response claimed it first.
    pub fn discard(&self, echo: i64) -> bool {
        self.slots.remove(&echo).is_some()
    }

    /// Number of calls still waiting for a response.
    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.slots.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Listener chains and the two dispatch strategies.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use onebot_events::Event;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::bot::Bot;
use crate::config::DispatchMode;

/// What a listener tells the chain to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Let the rest of the chain see the event.
    Continue,
    /// Claim the event; listeners registered after this one are skipped.
    Stop,
}

/// A handler for decoded events.
///
/// Listeners attach to one `(category, subtype)` pair and run in
/// registration order. Returning [`Flow::Stop`] short-circuits the rest
/// of the chain for that event.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Handle one event.
    async fn on_event(&self, bot: &Bot, event: &Event) -> Flow;
}

pub(crate) type BoxedHandler<T> = Box<dyn Fn(Bot, T) -> BoxFuture<'static, Flow> + Send + Sync>;

/// Adapts a closure over one concrete record type into a [`Listener`].
pub(crate) struct TypedListener<T> {
    pub extract: for<'a> fn(&'a Event) -> Option<&'a T>,
    pub handler: BoxedHandler<T>,
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Listener for TypedListener<T> {
    async fn on_event(&self, bot: &Bot, event: &Event) -> Flow {
        match (self.extract)(event) {
            Some(record) => (self.handler)(bot.clone(), record.clone()).await,
            None => Flow::Continue,
        }
    }
}

/// Registered listener chains, keyed by routing pair.
///
/// Writers are registration calls during setup; readers are the
/// dispatch path, which clones the chain out so it never runs handlers
/// under the lock.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    chains: RwLock<HashMap<(String, String), Vec<Arc<dyn Listener>>>>,
}

impl ListenerRegistry {
    pub fn add(&self, category: &str, subtype: &str, listener: Arc<dyn Listener>) {
        let mut chains = self.chains.write();
        chains
            .entry((category.to_owned(), subtype.to_owned()))
            .or_default()
            .push(listener);
    }

    pub fn chain(&self, category: &str, subtype: &str) -> Option<Vec<Arc<dyn Listener>>> {
        let chains = self.chains.read();
        chains
            .get(&(category.to_owned(), subtype.to_owned()))
            .cloned()
    }
}

pub(crate) type DispatchJob = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Concurrency strategy, fixed at session creation.
pub(crate) enum EventDispatcher {
    /// One worker drains a FIFO queue, running each job to completion.
    Serialized(mpsc::UnboundedSender<DispatchJob>),
    /// Every job becomes its own task.
    Concurrent,
}

impl EventDispatcher {
    pub fn new(mode: DispatchMode, shutdown: CancellationToken) -> Self {
        match mode {
            DispatchMode::Serialized => {
                let (queue, mut jobs) = mpsc::unbounded_channel::<DispatchJob>();
                let _ = tokio::spawn(async move {
                    loop {
                        tokio::select! {
                            () = shutdown.cancelled() => break,
                            job = jobs.recv() => match job {
                                Some(job) => job.await,
                                None => break,
                            },
                        }
                    }
                    debug!("serialized dispatch worker stopped");
                });
                Self::Serialized(queue)
            }
            DispatchMode::Concurrent => Self::Concurrent,
        }
    }

    pub fn submit(&self, job: DispatchJob) {
        match self {
            Self::Serialized(queue) => {
                if queue.send(job).is_err() {
                    debug!("dispatch queue is closed, dropping event");
                }
            }
            Self::Concurrent => {
                let _ = tokio::spawn(job);
            }
        }
    }
}

/// Run one chain over one event, isolating every listener.
///
/// A panicking listener is logged and skipped; the rest of the chain
/// still runs.
pub(crate) async fn run_chain(bot: Bot, event: Event, chain: Vec<Arc<dyn Listener>>) {
    for listener in chain {
        match AssertUnwindSafe(listener.on_event(&bot, &event))
            .catch_unwind()
            .await
        {
            Ok(Flow::Continue) => {}
            Ok(Flow::Stop) => break,
            Err(payload) => {
                error!(
                    category = %event.category(),
                    subtype = %event.subtype(),
                    panic = %panic_text(payload.as_ref()),
                    "listener panicked, continuing with the rest of the chain"
                );
            }
        }
    }
}

fn panic_text(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        text
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text
    } else {
        "opaque panic payload"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

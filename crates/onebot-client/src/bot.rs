//! The session handle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::{FutureExt, SinkExt};
use onebot_events::{
    Event, EventRegistry, FriendAddNotice, FriendRecallNotice, FriendRequest, GroupAdminNotice,
    GroupBanNotice, GroupDecreaseNotice, GroupIncreaseNotice, GroupMessage, GroupRecallNotice,
    GroupRequest, GroupUploadNotice, Heartbeat, Lifecycle, NotifyNotice, PrivateMessage,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace, warn};

use crate::config::ConnectConfig;
use crate::correlator::PendingTable;
use crate::dispatcher::{EventDispatcher, Flow, Listener, ListenerRegistry, TypedListener};
use crate::errors::{CallError, ConnectError};
use crate::limiter::{RateGate, RatePolicy, TokenBucket};
use crate::transport::{self, WsSink};
use crate::wire::CallFrame;

pub(crate) struct Shared {
    pub(crate) config: ConnectConfig,
    pub(crate) sink: Mutex<Option<WsSink>>,
    pub(crate) connected: AtomicBool,
    pub(crate) pending: PendingTable,
    pub(crate) listeners: ListenerRegistry,
    pub(crate) decoders: EventRegistry,
    pub(crate) limiter: parking_lot::RwLock<Option<Arc<RateGate>>>,
    pub(crate) dispatcher: EventDispatcher,
    pub(crate) shutdown: CancellationToken,
}

/// Handle to a live session.
///
/// Cheap to clone; every clone shares the same socket, pending-call
/// table, and listener registry.
#[derive(Clone)]
pub struct Bot {
    pub(crate) inner: Arc<Shared>,
}

macro_rules! listen {
    ($(#[$doc:meta])* $name:ident, $category:literal, $subtype:literal, $variant:ident, $record:ty) => {
        $(#[$doc])*
        pub fn $name<F, Fut>(&self, handler: F)
        where
            F: Fn(Bot, $record) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Flow> + Send + 'static,
        {
            self.register(
                $category,
                $subtype,
                Arc::new(TypedListener {
                    extract: |event| match event {
                        Event::$variant(record) => Some(record),
                        _ => None,
                    },
                    handler: Box::new(move |bot, record| handler(bot, record).boxed()),
                }),
            );
        }
    };
}

impl Bot {
    /// Dial the server and start the session.
    ///
    /// A failed dial is returned here; after that, socket losses are
    /// handled by the reconnect supervisor and never surface to the
    /// caller directly.
    pub async fn connect(config: ConnectConfig) -> Result<Self, ConnectError> {
        Self::connect_with(config, EventRegistry::builtin()).await
    }

    /// Dial with a caller-extended event decoder table.
    pub async fn connect_with(
        config: ConnectConfig,
        decoders: EventRegistry,
    ) -> Result<Self, ConnectError> {
        let stream = transport::dial(&config).await?;
        let bot = Self::assemble(config, decoders);
        // Publish the write half before the read loop spawns, so calls
        // issued right after connecting never race an unpolled task.
        let source = transport::attach(&bot, stream).await;
        transport::spawn_supervisor(bot.clone(), source);
        info!(self_id = bot.inner.config.self_id, "session started");
        Ok(bot)
    }

    fn assemble(config: ConnectConfig, decoders: EventRegistry) -> Self {
        let shutdown = CancellationToken::new();
        let dispatcher = EventDispatcher::new(config.dispatch, shutdown.clone());
        Self {
            inner: Arc::new(Shared {
                config,
                sink: Mutex::new(None),
                connected: AtomicBool::new(false),
                pending: PendingTable::default(),
                listeners: ListenerRegistry::default(),
                decoders,
                limiter: parking_lot::RwLock::new(None),
                dispatcher,
                shutdown,
            }),
        }
    }

    /// A session with no socket, for exercising dispatch and call
    /// bookkeeping without a server.
    #[cfg(test)]
    pub(crate) fn detached(config: ConnectConfig) -> Self {
        Self::assemble(config, EventRegistry::builtin())
    }

    /// The account id this session controls.
    #[must_use]
    pub fn self_id(&self) -> i64 {
        self.inner.config.self_id
    }

    /// Whether a socket is currently attached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// Whether [`Bot::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    /// Resolve once the session has been closed.
    pub async fn closed(&self) {
        self.inner.shutdown.cancelled().await;
    }

    /// Close the session: stop the supervisor and the dispatch worker,
    /// and release the socket. Idempotent and permanent; there is no
    /// reconnection after this.
    pub async fn close(&self) {
        self.inner.shutdown.cancel();
        self.inner.connected.store(false, Ordering::SeqCst);
        let mut sink = self.inner.sink.lock().await;
        if let Some(mut active) = sink.take() {
            let _ = active.close().await;
        }
        info!("session closed");
    }

    /// Gate every future call through `bucket` under `policy`.
    ///
    /// Replaces any previously set limiter. Calls already admitted are
    /// not affected.
    pub fn set_limiter(&self, policy: RatePolicy, bucket: TokenBucket) {
        *self.inner.limiter.write() = Some(Arc::new(RateGate::new(policy, bucket)));
    }

    /// Remove the rate limiter; calls are admitted unconditionally.
    pub fn clear_limiter(&self) {
        *self.inner.limiter.write() = None;
    }

    /// Run a task under the session's dispatch strategy: behind queued
    /// events in serialized mode, as its own task in concurrent mode.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.inner.dispatcher.submit(Box::pin(task));
    }

    /// Issue a call and wait for its response, with the configured
    /// timeout.
    pub async fn call(&self, action: &str, params: Option<Value>) -> Result<Value, CallError> {
        self.call_with_timeout(action, params, self.inner.config.call_timeout)
            .await
    }

    /// Issue a call and wait for its response.
    ///
    /// Admission through the rate limiter happens first and is not
    /// bounded by `timeout`; the deadline covers only the wait for the
    /// response. Exactly one of response, timeout, or a fail-fast error
    /// settles the call.
    pub async fn call_with_timeout(
        &self,
        action: &str,
        params: Option<Value>,
        timeout: Duration,
    ) -> Result<Value, CallError> {
        let gate = self.inner.limiter.read().clone();
        if let Some(gate) = gate {
            gate.admit().await?;
        }

        let (echo, mut rx) = self.inner.pending.register();
        let frame = CallFrame {
            action,
            params: params.as_ref(),
            echo,
        };
        let text = match serde_json::to_string(&frame) {
            Ok(text) => text,
            Err(error) => {
                let _ = self.inner.pending.discard(echo);
                return Err(CallError::Params(error));
            }
        };

        {
            let mut sink = self.inner.sink.lock().await;
            let Some(active) = sink.as_mut() else {
                drop(sink);
                let _ = self.inner.pending.discard(echo);
                return Err(CallError::Disconnected);
            };
            if let Err(error) = active.send(Message::Text(text.into())).await {
                warn!(%error, "socket write failed");
                *sink = None;
                self.inner.connected.store(false, Ordering::SeqCst);
                drop(sink);
                let _ = self.inner.pending.discard(echo);
                return Err(CallError::Disconnected);
            }
        }
        trace!(echo, action = %action, "call sent");

        match tokio::time::timeout(timeout, &mut rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CallError::Disconnected),
            Err(_) => {
                if self.inner.pending.discard(echo) {
                    Err(CallError::Timeout(timeout))
                } else {
                    // the response won the race; its result is in flight
                    rx.await.unwrap_or(Err(CallError::Disconnected))
                }
            }
        }
    }

    /// Append a listener to the chain for `(category, subtype)`.
    ///
    /// Chains run in registration order; a listener returning
    /// [`Flow::Stop`] keeps the rest of the chain from seeing that
    /// event.
    pub fn register(&self, category: &str, subtype: &str, listener: Arc<dyn Listener>) {
        self.inner.listeners.add(category, subtype, listener);
    }

    listen! {
        /// Listen for private messages.
        on_private_message, "message", "private", PrivateMessage, PrivateMessage
    }
    listen! {
        /// Listen for group messages.
        on_group_message, "message", "group", GroupMessage, GroupMessage
    }
    listen! {
        /// Listen for incoming friend requests.
        on_friend_request, "request", "friend", FriendRequest, FriendRequest
    }
    listen! {
        /// Listen for group join requests and invitations.
        on_group_request, "request", "group", GroupRequest, GroupRequest
    }
    listen! {
        /// Listen for group file uploads.
        on_group_upload, "notice", "group_upload", GroupUpload, GroupUploadNotice
    }
    listen! {
        /// Listen for group admin appointments and dismissals.
        on_group_admin, "notice", "group_admin", GroupAdmin, GroupAdminNotice
    }
    listen! {
        /// Listen for members leaving or being removed.
        on_group_decrease, "notice", "group_decrease", GroupDecrease, GroupDecreaseNotice
    }
    listen! {
        /// Listen for members joining.
        on_group_increase, "notice", "group_increase", GroupIncrease, GroupIncreaseNotice
    }
    listen! {
        /// Listen for group mutes and unmutes.
        on_group_ban, "notice", "group_ban", GroupBan, GroupBanNotice
    }
    listen! {
        /// Listen for new friends.
        on_friend_add, "notice", "friend_add", FriendAdd, FriendAddNotice
    }
    listen! {
        /// Listen for recalled group messages.
        on_group_recall, "notice", "group_recall", GroupRecall, GroupRecallNotice
    }
    listen! {
        /// Listen for recalled private messages.
        on_friend_recall, "notice", "friend_recall", FriendRecall, FriendRecallNotice
    }
    listen! {
        /// Listen for pokes, lucky-king draws, and honor changes.
        on_notify, "notice", "notify", Notify, NotifyNotice
    }
    listen! {
        /// Listen for lifecycle signals.
        on_lifecycle, "meta_event", "lifecycle", Lifecycle, Lifecycle
    }
    listen! {
        /// Listen for server heartbeats.
        on_heartbeat, "meta_event", "heartbeat", Heartbeat, Heartbeat
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use parking_lot::Mutex as PlMutex;
    use tokio::time::timeout;

    use super::*;
    use crate::dispatcher::run_chain;

    #[tokio::test]
    async fn typed_listener_receives_its_record() {
        let bot = Bot::detached(ConnectConfig::default());
        let log = Arc::new(PlMutex::new(Vec::new()));
        let seen = log.clone();
        bot.on_private_message(move |_bot, event| {
            let seen = seen.clone();
            async move {
                seen.lock().push(event.raw_message);
                Flow::Continue
            }
        });

        let chain = bot.inner.listeners.chain("message", "private").unwrap();
        let event = Event::PrivateMessage(PrivateMessage {
            raw_message: "hey".into(),
            ..PrivateMessage::default()
        });
        run_chain(bot.clone(), event, chain).await;
        assert_eq!(*log.lock(), ["hey"]);
    }

    #[tokio::test]
    async fn call_without_a_socket_fails_fast() {
        let bot = Bot::detached(ConnectConfig::default());
        assert_matches!(
            bot.call("get_status", None).await,
            Err(CallError::Disconnected)
        );
    }

    #[tokio::test]
    async fn close_is_idempotent_and_permanent() {
        let bot = Bot::detached(ConnectConfig::default());
        assert!(!bot.is_closed());
        bot.close().await;
        bot.close().await;
        assert!(bot.is_closed());
        assert!(!bot.is_connected());
        timeout(Duration::from_secs(1), bot.closed()).await.unwrap();
    }

    #[tokio::test]
    async fn schedule_runs_through_the_dispatcher() {
        let bot = Bot::detached(ConnectConfig::default());
        let (tx, rx) = tokio::sync::oneshot::channel();
        bot.schedule(async move {
            let _ = tx.send(());
        });
        timeout(Duration::from_secs(1), rx).await.unwrap().unwrap();
    }
}

//! Socket lifecycle: dialing, the read loop, reconnection, and inbound
//! frame routing.

use std::sync::atomic::Ordering;

use futures::StreamExt;
use futures::stream::{SplitSink, SplitStream};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use onebot_events::classify;

use crate::bot::Bot;
use crate::config::ConnectConfig;
use crate::dispatcher::run_chain;
use crate::errors::{CallError, ConnectError};

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub(crate) type WsSink = SplitSink<WsStream, Message>;

/// Open a websocket to the configured endpoint, attaching the bearer
/// credential when one is set.
pub(crate) async fn dial(config: &ConnectConfig) -> Result<WsStream, ConnectError> {
    let url = config.url();
    let mut request = url
        .clone()
        .into_client_request()
        .map_err(|source| ConnectError::Handshake {
            url: url.clone(),
            source,
        })?;
    if let Some(token) = &config.access_token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ConnectError::InvalidToken)?;
        let _ = request.headers_mut().insert(AUTHORIZATION, value);
    }
    let (stream, _response) = connect_async(request)
        .await
        .map_err(|source| ConnectError::Handshake { url, source })?;
    Ok(stream)
}

/// Split a freshly dialed socket, publish its write half, and hand back
/// the read half. Calls issued after this see a live sink.
pub(crate) async fn attach(bot: &Bot, stream: WsStream) -> SplitStream<WsStream> {
    let (sink, source) = stream.split();
    {
        let mut slot = bot.inner.sink.lock().await;
        *slot = Some(sink);
    }
    bot.inner.connected.store(true, Ordering::SeqCst);
    info!(url = %bot.inner.config.url(), "connected");
    source
}

/// Start the background task that owns the socket for the session's
/// lifetime: it pumps inbound frames and re-dials after losses until
/// the session is closed.
pub(crate) fn spawn_supervisor(bot: Bot, source: SplitStream<WsStream>) {
    let _ = tokio::spawn(async move {
        let mut next = Some(source);
        loop {
            let source = match next.take() {
                Some(source) => source,
                None => match redial(&bot).await {
                    Some(stream) => attach(&bot, stream).await,
                    None => break,
                },
            };
            serve(&bot, source).await;
            if bot.inner.shutdown.is_cancelled() {
                break;
            }
            warn!("connection lost, reconnecting");
        }
        debug!("connection supervisor stopped");
    });
}

/// Back off, then dial until it works. `None` means the session closed
/// while waiting.
async fn redial(bot: &Bot) -> Option<WsStream> {
    loop {
        tokio::select! {
            () = bot.inner.shutdown.cancelled() => return None,
            () = tokio::time::sleep(bot.inner.config.reconnect_delay) => {}
        }
        match dial(&bot.inner.config).await {
            Ok(stream) => return Some(stream),
            Err(error) => warn!(%error, "re-dial failed"),
        }
    }
}

/// Run one connection to completion: pump frames until the socket dies
/// or the session closes.
async fn serve(bot: &Bot, mut source: SplitStream<WsStream>) {
    loop {
        tokio::select! {
            () = bot.inner.shutdown.cancelled() => break,
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => route_frame(bot, text.as_str()),
                Some(Ok(Message::Close(_))) => {
                    info!("server closed the connection");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    warn!(%error, "socket read failed");
                    break;
                }
                None => break,
            },
        }
    }

    bot.inner.connected.store(false, Ordering::SeqCst);
    let mut slot = bot.inner.sink.lock().await;
    *slot = None;
}

/// Classify one inbound text frame and hand it to the correlator or the
/// event dispatcher. Malformed frames are logged and dropped.
fn route_frame(bot: &Bot, text: &str) {
    let frame: Value = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(error) => {
            warn!(%error, "dropping malformed frame");
            return;
        }
    };
    if let Some(echo) = frame.get("echo").and_then(Value::as_i64) {
        resolve_response(bot, echo, &frame);
        return;
    }
    dispatch_event(bot, &frame);
}

fn resolve_response(bot: &Bot, echo: i64, frame: &Value) {
    let retcode = frame.get("retcode").and_then(Value::as_i64).unwrap_or(0);
    let result = if retcode == 0 {
        Ok(frame.get("data").cloned().unwrap_or(Value::Null))
    } else {
        let message = frame
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        Err(CallError::Remote {
            code: retcode,
            message,
        })
    };
    if !bot.inner.pending.resolve(echo, result) {
        debug!(echo, "response for an unknown or already-settled call");
    }
}

fn dispatch_event(bot: &Bot, frame: &Value) {
    let Some((category, subtype)) = classify(frame) else {
        debug!("dropping unroutable frame");
        return;
    };
    let (category, subtype) = (category.to_owned(), subtype.to_owned());

    // look up the chain first so frames nobody listens for skip decoding
    let Some(chain) = bot.inner.listeners.chain(&category, &subtype) else {
        debug!(category = %category, subtype = %subtype, "no listeners, dropping event");
        return;
    };
    if chain.is_empty() {
        return;
    }

    let event = match bot.inner.decoders.decode(&category, &subtype, frame) {
        Ok(event) => event,
        Err(error) => {
            warn!(%error, category = %category, subtype = %subtype, "dropping undecodable event");
            return;
        }
    };
    bot.inner.dispatcher.submit(Box::pin(run_chain(
        bot.clone(),
        event,
        chain,
    )));
}

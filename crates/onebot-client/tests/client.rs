//! End-to-end tests against an in-process WebSocket server standing in
//! for the OneBot implementation.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use futures::{SinkExt, StreamExt};
use onebot_client::events::PrivateMessage;
use onebot_client::{
    Bot, CallError, ConnectConfig, DispatchMode, Flow, MessageChain, RatePolicy, TokenBucket,
    WsChannel,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{Request, Response};
use tokio_tungstenite::{WebSocketStream, accept_async, accept_hdr_async};

const TIMEOUT: Duration = Duration::from_secs(5);

type ServerSocket = WebSocketStream<TcpStream>;

async fn bind() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

fn config(port: u16) -> ConnectConfig {
    ConnectConfig {
        reconnect_delay: Duration::from_millis(100),
        ..ConnectConfig::new("127.0.0.1", port, 10_000)
    }
}

async fn accept_one(listener: &TcpListener) -> ServerSocket {
    let (stream, _) = tokio::time::timeout(TIMEOUT, listener.accept())
        .await
        .unwrap()
        .unwrap();
    accept_async(stream).await.unwrap()
}

async fn boot(listener: &TcpListener, config: ConnectConfig) -> (Bot, ServerSocket) {
    let (bot, server) = tokio::join!(Bot::connect(config), accept_one(listener));
    (bot.unwrap(), server)
}

async fn read_json(server: &mut ServerSocket) -> Value {
    loop {
        let frame = tokio::time::timeout(TIMEOUT, server.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn send_json(server: &mut ServerSocket, frame: &Value) {
    server.send(Message::text(frame.to_string())).await.unwrap();
}

async fn wait_until(mut predicate: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while !predicate() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn group_message(message_id: i32) -> Value {
    json!({
        "time": 1_700_000_000,
        "self_id": 10_000,
        "post_type": "message",
        "message_type": "group",
        "sub_type": "normal",
        "message_id": message_id,
        "group_id": 99,
        "user_id": 9,
        "message": [{ "type": "text", "data": { "text": "hi" } }],
        "raw_message": "hi",
        "font": 0,
    })
}

#[tokio::test]
async fn group_call_round_trips_message_id() {
    let (listener, port) = bind().await;
    let (bot, mut server) = boot(&listener, config(port)).await;

    let driver = tokio::spawn(async move {
        let frame = read_json(&mut server).await;
        assert_eq!(frame["action"], "send_group_msg");
        assert_eq!(frame["echo"], 1);
        assert_eq!(
            frame["params"],
            json!({
                "group_id": 99,
                "message": [{ "type": "text", "data": { "text": "hi" } }],
            })
        );
        send_json(
            &mut server,
            &json!({ "status": "ok", "retcode": 0, "data": { "message_id": 42 }, "echo": 1 }),
        )
        .await;
    });

    let message_id = bot
        .send_group_message(99, MessageChain::new().text("hi"))
        .await
        .unwrap();
    assert_eq!(message_id, 42);
    driver.await.unwrap();
}

#[tokio::test]
async fn private_event_reaches_registered_listener() {
    let (listener, port) = bind().await;
    let (bot, mut server) = boot(&listener, config(port)).await;

    let (tx, rx) = oneshot::channel();
    let slot = Arc::new(Mutex::new(Some(tx)));
    bot.on_private_message(move |_bot, event| {
        let slot = slot.clone();
        async move {
            if let Some(tx) = slot.lock().take() {
                let _ = tx.send((event.user_id, event.message.plain_text()));
            }
            Flow::Stop
        }
    });

    send_json(
        &mut server,
        &json!({
            "time": 1_700_000_000,
            "self_id": 10_000,
            "post_type": "message",
            "message_type": "private",
            "sub_type": "friend",
            "message_id": 7,
            "user_id": 9,
            "message": [{ "type": "text", "data": { "text": "hey" } }],
            "raw_message": "hey",
            "font": 0,
        }),
    )
    .await;

    let (user_id, text) = tokio::time::timeout(TIMEOUT, rx).await.unwrap().unwrap();
    assert_eq!(user_id, 9);
    assert_eq!(text, "hey");
}

#[tokio::test]
async fn remote_failure_surfaces_code_and_message() {
    let (listener, port) = bind().await;
    let (bot, mut server) = boot(&listener, config(port)).await;

    let driver = tokio::spawn(async move {
        let frame = read_json(&mut server).await;
        send_json(
            &mut server,
            &json!({
                "status": "failed",
                "retcode": 100,
                "data": null,
                "message": "param error",
                "echo": frame["echo"],
            }),
        )
        .await;
    });

    let error = bot.call("send_msg", Some(json!({}))).await.unwrap_err();
    assert_matches!(
        error,
        CallError::Remote { code: 100, ref message } if message == "param error"
    );
    driver.await.unwrap();
}

#[tokio::test]
async fn unanswered_call_times_out() {
    let (listener, port) = bind().await;
    let mut config = config(port);
    config.call_timeout = Duration::from_millis(200);
    let (bot, mut server) = boot(&listener, config).await;

    let driver = tokio::spawn(async move {
        let _ = read_json(&mut server).await;
        // hold the socket open so nothing resolves the call early
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(server);
    });

    assert_matches!(
        bot.call("get_status", None).await,
        Err(CallError::Timeout(_))
    );
    driver.abort();
}

#[tokio::test]
async fn drop_policy_rejects_before_any_frame_is_sent() {
    let (listener, port) = bind().await;
    let (bot, mut server) = boot(&listener, config(port)).await;

    let driver = tokio::spawn(async move {
        let mut echoes = Vec::new();
        for _ in 0..2 {
            let frame = read_json(&mut server).await;
            echoes.push(frame["echo"].as_i64().unwrap());
            send_json(
                &mut server,
                &json!({ "status": "ok", "retcode": 0, "data": {}, "echo": frame["echo"] }),
            )
            .await;
        }
        echoes
    });

    bot.set_limiter(RatePolicy::Drop, TokenBucket::new(0.0, 1));
    let _ = bot.call("get_status", None).await.unwrap();
    assert_matches!(
        bot.call("get_status", None).await,
        Err(CallError::RateLimited)
    );
    bot.clear_limiter();
    let _ = bot.call("get_status", None).await.unwrap();

    assert_eq!(driver.await.unwrap(), vec![1, 2]);
}

#[tokio::test]
async fn serialized_dispatch_preserves_arrival_order() {
    let (listener, port) = bind().await;
    let (bot, mut server) = boot(&listener, config(port)).await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let (tx, rx) = oneshot::channel();
    let done = Arc::new(Mutex::new(Some(tx)));
    let seen = log.clone();
    bot.on_group_message(move |_bot, event| {
        let seen = seen.clone();
        let done = done.clone();
        async move {
            seen.lock().push(format!("begin {}", event.message_id));
            tokio::time::sleep(Duration::from_millis(50)).await;
            seen.lock().push(format!("end {}", event.message_id));
            if event.message_id == 2 {
                if let Some(tx) = done.lock().take() {
                    let _ = tx.send(());
                }
            }
            Flow::Continue
        }
    });

    for id in 1..=2 {
        send_json(&mut server, &group_message(id)).await;
    }
    tokio::time::timeout(TIMEOUT, rx).await.unwrap().unwrap();
    assert_eq!(*log.lock(), ["begin 1", "end 1", "begin 2", "end 2"]);
}

#[tokio::test]
async fn concurrent_dispatch_lets_events_overlap() {
    let (listener, port) = bind().await;
    let mut config = config(port);
    config.dispatch = DispatchMode::Concurrent;
    let (bot, mut server) = boot(&listener, config).await;

    let log = Arc::new(Mutex::new(Vec::new()));
    let (tx, rx) = oneshot::channel();
    let done = Arc::new(Mutex::new(Some(tx)));
    let seen = log.clone();
    bot.on_group_message(move |_bot, event| {
        let seen = seen.clone();
        let done = done.clone();
        async move {
            let nap = if event.message_id == 1 { 70 } else { 10 };
            tokio::time::sleep(Duration::from_millis(nap)).await;
            seen.lock().push(event.message_id);
            if seen.lock().len() == 2 {
                if let Some(tx) = done.lock().take() {
                    let _ = tx.send(());
                }
            }
            Flow::Continue
        }
    });

    send_json(&mut server, &group_message(1)).await;
    send_json(&mut server, &group_message(2)).await;
    tokio::time::timeout(TIMEOUT, rx).await.unwrap().unwrap();
    assert_eq!(*log.lock(), [2, 1]);
}

#[tokio::test]
async fn reconnects_after_socket_loss_and_fails_fast_meanwhile() {
    let (listener, port) = bind().await;
    let (bot, server) = boot(&listener, config(port)).await;

    drop(server);
    wait_until(|| !bot.is_connected()).await;
    assert_matches!(
        bot.call("get_status", None).await,
        Err(CallError::Disconnected)
    );

    let mut server = accept_one(&listener).await;
    wait_until(|| bot.is_connected()).await;

    let driver = tokio::spawn(async move {
        let frame = read_json(&mut server).await;
        assert_eq!(frame["echo"], 2);
        send_json(
            &mut server,
            &json!({ "status": "ok", "retcode": 0, "data": {}, "echo": 2 }),
        )
        .await;
    });
    let _ = bot.call("get_status", None).await.unwrap();
    driver.await.unwrap();
}

#[tokio::test]
async fn close_is_idempotent_and_fails_later_calls() {
    let (listener, port) = bind().await;
    let (bot, server) = boot(&listener, config(port)).await;

    bot.close().await;
    bot.close().await;
    assert!(bot.is_closed());
    assert!(!bot.is_connected());
    assert_matches!(
        bot.call("get_status", None).await,
        Err(CallError::Disconnected)
    );
    tokio::time::timeout(TIMEOUT, bot.closed()).await.unwrap();

    // a closed session must not redial
    tokio::time::sleep(Duration::from_millis(300)).await;
    let redial = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
    assert!(redial.is_err());
    drop(server);
}

#[tokio::test]
async fn duplicated_and_dropped_responses_resolve_each_call_once() {
    let (listener, port) = bind().await;
    let mut config = config(port);
    config.call_timeout = Duration::from_millis(300);
    let (bot, mut server) = boot(&listener, config).await;

    const CALLS: i64 = 32;

    let driver = tokio::spawn(async move {
        for _ in 0..CALLS {
            let frame = read_json(&mut server).await;
            let echo = frame["echo"].as_i64().unwrap();
            if echo % 2 == 0 {
                let response =
                    json!({ "status": "ok", "retcode": 0, "data": { "n": echo }, "echo": echo });
                send_json(&mut server, &response).await;
                send_json(&mut server, &response).await;
            }
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(server);
    });

    let calls = (0..CALLS).map(|_| bot.call("get_status", None));
    let results = futures::future::join_all(calls).await;

    for (index, result) in results.into_iter().enumerate() {
        let echo = index as i64 + 1;
        if echo % 2 == 0 {
            assert_eq!(result.unwrap()["n"], echo);
        } else {
            assert_matches!(result, Err(CallError::Timeout(_)));
        }
    }
    driver.await.unwrap();
}

#[tokio::test]
async fn quick_reply_strips_the_context_payload() {
    let (listener, port) = bind().await;
    let (bot, mut server) = boot(&listener, config(port)).await;

    let event: PrivateMessage = serde_json::from_value(json!({
        "time": 1_700_000_000,
        "self_id": 10_000,
        "post_type": "message",
        "message_type": "private",
        "sub_type": "friend",
        "message_id": 7,
        "user_id": 9,
        "message": [{ "type": "text", "data": { "text": "hey" } }],
        "raw_message": "hey",
        "font": 0,
    }))
    .unwrap();

    let driver = tokio::spawn(async move {
        let frame = read_json(&mut server).await;
        assert_eq!(frame["action"], ".handle_quick_operation");
        let context = &frame["params"]["context"];
        assert_eq!(context["user_id"], 9);
        assert_eq!(context["message"], Value::Null);
        assert_eq!(context["raw_message"], "");
        assert_eq!(
            frame["params"]["operation"],
            json!({ "reply": [{ "type": "text", "data": { "text": "hi back" } }] })
        );
        send_json(
            &mut server,
            &json!({ "status": "ok", "retcode": 0, "data": null, "echo": frame["echo"] }),
        )
        .await;
    });

    bot.reply_private(&event, MessageChain::new().text("hi back"))
        .await
        .unwrap();
    driver.await.unwrap();
}

#[tokio::test]
async fn bearer_token_is_sent_during_handshake() {
    let (listener, port) = bind().await;
    let mut config = config(port);
    config.access_token = Some("sesame".into());

    let auth = Arc::new(Mutex::new(None));
    let seen = auth.clone();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        accept_hdr_async(stream, move |request: &Request, response: Response| {
            *seen.lock() = request
                .headers()
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            Ok(response)
        })
        .await
        .unwrap()
    });

    let bot = Bot::connect(config).await.unwrap();
    let _socket = server.await.unwrap();
    assert_eq!(auth.lock().as_deref(), Some("Bearer sesame"));
    drop(bot);
}

#[tokio::test]
async fn channel_selects_endpoint_path() {
    let (listener, port) = bind().await;
    let mut config = config(port);
    config.channel = WsChannel::Api;

    let path = Arc::new(Mutex::new(String::new()));
    let seen = path.clone();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        accept_hdr_async(stream, move |request: &Request, response: Response| {
            *seen.lock() = request.uri().path().to_owned();
            Ok(response)
        })
        .await
        .unwrap()
    });

    let bot = Bot::connect(config).await.unwrap();
    let _socket = server.await.unwrap();
    assert_eq!(*path.lock(), "/api");
    drop(bot);
}

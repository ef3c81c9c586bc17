//! OneBot v11 client runtime.
//!
//! A [`Bot`] owns one WebSocket session to an OneBot implementation:
//! it correlates action calls with their responses by echo id, decodes
//! incoming events through a registry, and feeds them to listener
//! chains under a serialized or concurrent dispatch strategy. Lost
//! sockets are redialed in the background; callers only ever see
//! errors tied to their own call.
//!
//! ```no_run
//! use onebot_client::{Bot, ConnectConfig, Flow};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bot = Bot::connect(ConnectConfig::new("localhost", 6700, 123_456)).await?;
//!     bot.on_group_message(|bot, event| async move {
//!         let _ = bot.send_group_message(event.group_id, event.message).await;
//!         Flow::Continue
//!     });
//!     bot.closed().await;
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

mod api;
mod bot;
pub mod config;
mod correlator;
pub mod dispatcher;
pub mod errors;
pub mod limiter;
mod quick;
mod transport;
mod wire;

pub use bot::Bot;
pub use config::{ConnectConfig, DispatchMode, WsChannel};
pub use dispatcher::{Flow, Listener};
pub use errors::{CallError, ConfigError, ConnectError};
pub use limiter::{RatePolicy, TokenBucket};

pub use onebot_events as events;
pub use onebot_events::{Event, EventRegistry};
pub use onebot_message as message;
pub use onebot_message::{MessageChain, Segment};

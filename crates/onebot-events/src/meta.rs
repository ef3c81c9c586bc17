//! Meta events: the server reporting on itself.

use serde::{Deserialize, Serialize};

/// Lifecycle signal.
///
/// `sub_type` is `connect` (sent once on every fresh connection),
/// `enable`, or `disable`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifecycle {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `meta_event`.
    pub post_type: String,
    /// Always `lifecycle`.
    pub meta_event_type: String,
    /// Signal kind.
    pub sub_type: String,
}

/// Health snapshot carried by a [`Heartbeat`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotStatus {
    /// Whether the account is online; `None` when the server cannot tell.
    pub online: Option<bool>,
    /// Whether the server considers itself healthy.
    pub good: bool,
}

/// Periodic heartbeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heartbeat {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `meta_event`.
    pub post_type: String,
    /// Always `heartbeat`.
    pub meta_event_type: String,
    /// Health snapshot.
    pub status: BotStatus,
    /// Interval until the next heartbeat, in milliseconds.
    pub interval: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Request events: things the bot is being asked to approve.

use serde::{Deserialize, Serialize};

/// An incoming friend request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendRequest {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `request`.
    pub post_type: String,
    /// Always `friend`.
    pub request_type: String,
    /// Account id of the requester.
    pub user_id: i64,
    /// Message attached to the request.
    pub comment: String,
    /// Opaque token to pass back when approving or rejecting.
    pub flag: String,
}

/// A request to join a group the bot administers, or an invitation for
/// the bot itself to join one.
///
/// `sub_type` is `add` (someone wants in) or `invite` (the bot was
/// invited).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupRequest {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `request`.
    pub post_type: String,
    /// Always `group`.
    pub request_type: String,
    /// Request kind.
    pub sub_type: String,
    /// Group the request concerns.
    pub group_id: i64,
    /// Account id of the requester or inviter.
    pub user_id: i64,
    /// Message attached to the request.
    pub comment: String,
    /// Opaque token to pass back when approving or rejecting.
    pub flag: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

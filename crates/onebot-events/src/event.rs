//! The event sum type and frame classification.

use serde_json::Value;

use crate::message::{GroupMessage, PrivateMessage};
use crate::meta::{Heartbeat, Lifecycle};
use crate::notice::{
    FriendAddNotice, FriendRecallNotice, GroupAdminNotice, GroupBanNotice, GroupDecreaseNotice,
    GroupIncreaseNotice, GroupRecallNotice, GroupUploadNotice, NotifyNotice,
};
use crate::request::{FriendRequest, GroupRequest};

/// Any inbound push event, decoded.
///
/// The `Other` variant carries events produced by caller-registered
/// decoders that do not map onto a standard record.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `message` / `private`.
    PrivateMessage(PrivateMessage),
    /// `message` / `group`.
    GroupMessage(GroupMessage),
    /// `request` / `friend`.
    FriendRequest(FriendRequest),
    /// `request` / `group`.
    GroupRequest(GroupRequest),
    /// `notice` / `group_upload`.
    GroupUpload(GroupUploadNotice),
    /// `notice` / `group_admin`.
    GroupAdmin(GroupAdminNotice),
    /// `notice` / `group_decrease`.
    GroupDecrease(GroupDecreaseNotice),
    /// `notice` / `group_increase`.
    GroupIncrease(GroupIncreaseNotice),
    /// `notice` / `group_ban`.
    GroupBan(GroupBanNotice),
    /// `notice` / `friend_add`.
    FriendAdd(FriendAddNotice),
    /// `notice` / `group_recall`.
    GroupRecall(GroupRecallNotice),
    /// `notice` / `friend_recall`.
    FriendRecall(FriendRecallNotice),
    /// `notice` / `notify`.
    Notify(NotifyNotice),
    /// `meta_event` / `lifecycle`.
    Lifecycle(Lifecycle),
    /// `meta_event` / `heartbeat`.
    Heartbeat(Heartbeat),
    /// A non-standard event, kept as its raw frame.
    Other {
        /// The frame's `post_type`.
        category: String,
        /// The frame's `<category>_type`.
        subtype: String,
        /// The whole frame.
        frame: Value,
    },
}

impl Event {
    /// The `post_type` this event arrived under.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::PrivateMessage(_) | Self::GroupMessage(_) => "message",
            Self::FriendRequest(_) | Self::GroupRequest(_) => "request",
            Self::GroupUpload(_)
            | Self::GroupAdmin(_)
            | Self::GroupDecrease(_)
            | Self::GroupIncrease(_)
            | Self::GroupBan(_)
            | Self::FriendAdd(_)
            | Self::GroupRecall(_)
            | Self::FriendRecall(_)
            | Self::Notify(_) => "notice",
            Self::Lifecycle(_) | Self::Heartbeat(_) => "meta_event",
            Self::Other { category, .. } => category,
        }
    }

    /// The `<category>_type` this event arrived under.
    #[must_use]
    pub fn subtype(&self) -> &str {
        match self {
            Self::PrivateMessage(_) => "private",
            Self::GroupMessage(_) => "group",
            Self::FriendRequest(_) => "friend",
            Self::GroupRequest(_) => "group",
            Self::GroupUpload(_) => "group_upload",
            Self::GroupAdmin(_) => "group_admin",
            Self::GroupDecrease(_) => "group_decrease",
            Self::GroupIncrease(_) => "group_increase",
            Self::GroupBan(_) => "group_ban",
            Self::FriendAdd(_) => "friend_add",
            Self::GroupRecall(_) => "group_recall",
            Self::FriendRecall(_) => "friend_recall",
            Self::Notify(_) => "notify",
            Self::Lifecycle(_) => "lifecycle",
            Self::Heartbeat(_) => "heartbeat",
            Self::Other { subtype, .. } => subtype,
        }
    }
}

/// Read the routing pair off a raw event frame.
///
/// Returns `None` when the frame has no string `post_type`, or no string
/// subtype field named after it.
#[must_use]
pub fn classify(frame: &Value) -> Option<(&str, &str)> {
    let category = frame.get("post_type")?.as_str()?;
    let subtype = frame.get(format!("{category}_type"))?.as_str()?;
    Some((category, subtype))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Notice events: state changes pushed by the server.

use serde::{Deserialize, Serialize};

/// A file referenced by a [`GroupUploadNotice`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct File {
    /// File id.
    pub id: String,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// Bus id, needed by some download endpoints.
    pub busid: i64,
}

/// A file was uploaded to a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupUploadNotice {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `notice`.
    pub post_type: String,
    /// Always `group_upload`.
    pub notice_type: String,
    /// Group it happened in.
    pub group_id: i64,
    /// Uploader account id.
    pub user_id: i64,
    /// The uploaded file.
    pub file: File,
}

/// A group admin was appointed or dismissed.
///
/// `sub_type` is `set` or `unset`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupAdminNotice {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `notice`.
    pub post_type: String,
    /// Always `group_admin`.
    pub notice_type: String,
    /// Change kind.
    pub sub_type: String,
    /// Group it happened in.
    pub group_id: i64,
    /// The member whose admin status changed.
    pub user_id: i64,
}

/// A member left or was removed from a group.
///
/// `sub_type` is `leave`, `kick`, or `kick_me` (the bot itself was
/// removed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDecreaseNotice {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `notice`.
    pub post_type: String,
    /// Always `group_decrease`.
    pub notice_type: String,
    /// Departure kind.
    pub sub_type: String,
    /// Group it happened in.
    pub group_id: i64,
    /// Who performed the removal; equals `user_id` on a voluntary leave.
    pub operator_id: i64,
    /// The member who left.
    pub user_id: i64,
}

/// A member joined a group.
///
/// `sub_type` is `approve` (request accepted) or `invite`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupIncreaseNotice {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `notice`.
    pub post_type: String,
    /// Always `group_increase`.
    pub notice_type: String,
    /// Join kind.
    pub sub_type: String,
    /// Group it happened in.
    pub group_id: i64,
    /// Who approved or sent the invitation.
    pub operator_id: i64,
    /// The member who joined.
    pub user_id: i64,
}

/// A member was muted or unmuted.
///
/// `sub_type` is `ban` or `lift_ban`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupBanNotice {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `notice`.
    pub post_type: String,
    /// Always `group_ban`.
    pub notice_type: String,
    /// Mute or unmute.
    pub sub_type: String,
    /// Group it happened in.
    pub group_id: i64,
    /// The admin who acted.
    pub operator_id: i64,
    /// The muted member.
    pub user_id: i64,
    /// Mute duration in seconds; 0 on `lift_ban`.
    pub duration: i64,
}

/// A new friend was added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendAddNotice {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `notice`.
    pub post_type: String,
    /// Always `friend_add`.
    pub notice_type: String,
    /// The new friend's account id.
    pub user_id: i64,
}

/// A group message was recalled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupRecallNotice {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `notice`.
    pub post_type: String,
    /// Always `group_recall`.
    pub notice_type: String,
    /// Group it happened in.
    pub group_id: i64,
    /// Author of the recalled message.
    pub user_id: i64,
    /// Who recalled it; an admin may recall others' messages.
    pub operator_id: i64,
    /// Id of the recalled message.
    pub message_id: i64,
}

/// A private message was recalled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriendRecallNotice {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `notice`.
    pub post_type: String,
    /// Always `friend_recall`.
    pub notice_type: String,
    /// The friend who recalled their message.
    pub user_id: i64,
    /// Id of the recalled message.
    pub message_id: i64,
}

/// Pokes, lucky-king announcements, and honor changes.
///
/// `sub_type` is `poke`, `lucky_king`, or `honor`; `honor_type` is set
/// only for `honor` and is `talkative`, `performer`, or `emotion`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyNotice {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `notice`.
    pub post_type: String,
    /// Always `notify`.
    pub notice_type: String,
    /// Notification kind.
    pub sub_type: String,
    /// Group it happened in.
    pub group_id: i64,
    /// Which honor changed, on `honor` notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honor_type: Option<String>,
    /// Who triggered it: the poker, the red-envelope sender, or the
    /// honored member.
    pub user_id: i64,
    /// The poked member or the lucky king.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<i64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

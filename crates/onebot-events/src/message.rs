//! Message events.

use onebot_core::{AnonymousMember, Member, Profile};
use onebot_message::MessageChain;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message received in a private conversation.
///
/// `sub_type` is `friend`, `group` (a temporary conversation opened from
/// a group), or `other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivateMessage {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `message`.
    pub post_type: String,
    /// Always `private`.
    pub message_type: String,
    /// Conversation kind.
    pub sub_type: String,
    /// Id of the received message, usable for recall and reply.
    pub message_id: i32,
    /// Sender account id.
    pub user_id: i64,
    /// Decoded message content.
    pub message: MessageChain,
    /// Source text of the message before decoding.
    pub raw_message: String,
    /// Font id.
    pub font: i32,
    /// Sender profile, as far as the server knows it.
    pub sender: Option<Profile>,
}

impl PrivateMessage {
    /// Context form for quick operations: the payload fields are
    /// stripped before re-submission.
    #[must_use]
    pub fn simplified(&self) -> Value {
        strip_payload(serde_json::to_value(self).unwrap_or(Value::Null))
    }
}

/// A message received in a group.
///
/// `sub_type` is `normal`, `anonymous`, or `notice` (a group
/// announcement).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMessage {
    /// Unix timestamp of the event.
    pub time: i64,
    /// Account id of the bot that received it.
    pub self_id: i64,
    /// Always `message`.
    pub post_type: String,
    /// Always `group`.
    pub message_type: String,
    /// Message kind within the group.
    pub sub_type: String,
    /// Id of the received message, usable for recall and reply.
    pub message_id: i32,
    /// Id of the group it was sent in.
    pub group_id: i64,
    /// Sender account id.
    pub user_id: i64,
    /// Anonymous identity, present only on anonymous messages.
    pub anonymous: Option<AnonymousMember>,
    /// Decoded message content.
    pub message: MessageChain,
    /// Source text of the message before decoding.
    pub raw_message: String,
    /// Font id.
    pub font: i32,
    /// Sender's membership record in the group.
    pub sender: Option<Member>,
}

impl GroupMessage {
    /// Context form for quick operations: the payload fields are
    /// stripped before re-submission.
    #[must_use]
    pub fn simplified(&self) -> Value {
        strip_payload(serde_json::to_value(self).unwrap_or(Value::Null))
    }
}

fn strip_payload(mut value: Value) -> Value {
    if let Some(object) = value.as_object_mut() {
        let _ = object.insert("message".into(), Value::Null);
        let _ = object.insert("raw_message".into(), Value::String(String::new()));
    }
    value
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use onebot_core::{Role, Sex};
    use serde_json::json;

    use super::*;

    fn private_frame() -> Value {
        json!({
            "time": 1_700_000_000,
            "self_id": 10_000,
            "post_type": "message",
            "message_type": "private",
            "sub_type": "friend",
            "message_id": 7,
            "user_id": 9,
            "message": [{"type": "text", "data": {"text": "hey"}}],
            "raw_message": "hey",
            "font": 0,
            "sender": {"user_id": 9, "nickname": "nine", "sex": "female", "age": 20},
        })
    }

    #[test]
    fn decodes_private_frame() {
        let event: PrivateMessage = serde_json::from_value(private_frame()).unwrap();
        assert_eq!(event.user_id, 9);
        assert_eq!(event.message_id, 7);
        assert_eq!(event.message.plain_text(), "hey");
        let sender = event.sender.unwrap();
        assert_eq!(sender.sex, Sex::Female);
        assert_eq!(sender.to_string(), "nine(9)");
    }

    #[test]
    fn decodes_group_frame_with_member_sender() {
        let frame = json!({
            "time": 1_700_000_001,
            "self_id": 10_000,
            "post_type": "message",
            "message_type": "group",
            "sub_type": "normal",
            "message_id": 8,
            "group_id": 20_002,
            "user_id": 9,
            "message": [{"type": "at", "data": {"qq": "10000"}}, {"type": "text", "data": {"text": " hi"}}],
            "raw_message": "[CQ:at,qq=10000] hi",
            "font": 0,
            "sender": {"user_id": 9, "nickname": "nine", "role": "admin"},
        });
        let event: GroupMessage = serde_json::from_value(frame).unwrap();
        assert_eq!(event.group_id, 20_002);
        assert!(event.anonymous.is_none());
        assert_eq!(event.message.len(), 2);
        assert_eq!(event.sender.unwrap().role, Role::Admin);
    }

    #[test]
    fn tolerates_unknown_and_missing_fields() {
        let frame = json!({
            "post_type": "message",
            "message_type": "private",
            "user_id": 1,
            "message": [],
            "some_future_field": {"a": 1},
        });
        let event: PrivateMessage = serde_json::from_value(frame).unwrap();
        assert_eq!(event.user_id, 1);
        assert_eq!(event.time, 0);
        assert!(event.sender.is_none());
    }

    #[test]
    fn simplified_strips_message_payload() {
        let event: GroupMessage = serde_json::from_value(json!({
            "post_type": "message",
            "message_type": "group",
            "group_id": 5,
            "user_id": 6,
            "message": [{"type": "text", "data": {"text": "long"}}],
            "raw_message": "long",
        }))
        .unwrap();
        let context = event.simplified();
        assert_eq!(context["message"], Value::Null);
        assert_eq!(context["raw_message"], "");
        assert_eq!(context["group_id"], 5);
        assert_eq!(context["message_type"], "group");
    }
}

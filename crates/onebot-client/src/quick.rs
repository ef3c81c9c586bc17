//! Quick operations: follow-up actions phrased against the event that
//! triggered them.

use serde_json::{Value, json};

use onebot_events::{FriendRequest, GroupMessage, GroupRequest, PrivateMessage};
use onebot_message::MessageChain;

use crate::bot::Bot;
use crate::errors::CallError;

impl Bot {
    async fn quick_operation(&self, context: Value, operation: Value) -> Result<(), CallError> {
        let params = json!({ "context": context, "operation": operation });
        let _ = self.call(".handle_quick_operation", Some(params)).await?;
        Ok(())
    }

    /// Reply to a private message.
    pub async fn reply_private(
        &self,
        event: &PrivateMessage,
        reply: MessageChain,
    ) -> Result<(), CallError> {
        self.quick_operation(event.simplified(), json!({ "reply": reply }))
            .await
    }

    /// Reply in the group the message came from, optionally mentioning
    /// the sender.
    pub async fn reply_group(
        &self,
        event: &GroupMessage,
        reply: MessageChain,
        at_sender: bool,
    ) -> Result<(), CallError> {
        self.quick_operation(
            event.simplified(),
            json!({ "reply": reply, "at_sender": at_sender }),
        )
        .await
    }

    /// Recall the triggering group message.
    pub async fn recall_message(&self, event: &GroupMessage) -> Result<(), CallError> {
        self.quick_operation(event.simplified(), json!({ "delete": true }))
            .await
    }

    /// Remove the sender of the triggering message from the group.
    pub async fn kick_sender(&self, event: &GroupMessage) -> Result<(), CallError> {
        self.quick_operation(event.simplified(), json!({ "kick": true }))
            .await
    }

    /// Mute the sender of the triggering message for `duration_secs`.
    pub async fn ban_sender(
        &self,
        event: &GroupMessage,
        duration_secs: i32,
    ) -> Result<(), CallError> {
        self.quick_operation(
            event.simplified(),
            json!({ "ban": true, "ban_duration": duration_secs }),
        )
        .await
    }

    /// Approve or reject a friend request; `remark` names the new
    /// friend on approval.
    pub async fn approve_friend_request(
        &self,
        event: &FriendRequest,
        approve: bool,
        remark: Option<&str>,
    ) -> Result<(), CallError> {
        let context = serde_json::to_value(event).map_err(CallError::Params)?;
        let mut operation = json!({ "approve": approve });
        if let Some(remark) = remark {
            operation["remark"] = Value::from(remark);
        }
        self.quick_operation(context, operation).await
    }

    /// Approve or reject a group join request or invitation; `reason`
    /// is delivered to the requester on rejection.
    pub async fn approve_group_request(
        &self,
        event: &GroupRequest,
        approve: bool,
        reason: Option<&str>,
    ) -> Result<(), CallError> {
        let context = serde_json::to_value(event).map_err(CallError::Params)?;
        let mut operation = json!({ "approve": approve });
        if let Some(reason) = reason {
            operation["reason"] = Value::from(reason);
        }
        self.quick_operation(context, operation).await
    }
}

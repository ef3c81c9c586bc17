//! Typed wrappers over the action API.

use serde::Deserialize;
use serde_json::json;

use onebot_message::MessageChain;

use crate::bot::Bot;
use crate::errors::CallError;

#[derive(Debug, Deserialize)]
struct MessageIdData {
    message_id: i32,
}

impl Bot {
    /// Send a private message, returning the id the server assigned it.
    pub async fn send_private_message(
        &self,
        user_id: i64,
        message: MessageChain,
    ) -> Result<i32, CallError> {
        let params = json!({ "user_id": user_id, "message": message });
        let data = self.call("send_private_msg", Some(params)).await?;
        let data: MessageIdData = serde_json::from_value(data).map_err(CallError::Response)?;
        Ok(data.message_id)
    }

    /// Send a group message, returning the id the server assigned it.
    pub async fn send_group_message(
        &self,
        group_id: i64,
        message: MessageChain,
    ) -> Result<i32, CallError> {
        let params = json!({ "group_id": group_id, "message": message });
        let data = self.call("send_group_msg", Some(params)).await?;
        let data: MessageIdData = serde_json::from_value(data).map_err(CallError::Response)?;
        Ok(data.message_id)
    }

    /// Recall a message by id. Works on own messages, and on others'
    /// where the account has the rights for it.
    pub async fn delete_message(&self, message_id: i64) -> Result<(), CallError> {
        let params = json!({ "message_id": message_id });
        let _ = self.call("delete_msg", Some(params)).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

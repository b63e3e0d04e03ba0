//! # Chat Message Data Transfer Objects

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use entity::{messages, users};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::UserRef;

/// Request to post a chat message
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct SendMessageRequest {
    #[serde(alias = "text")]
    #[validate(length(max = 5000, message = "Message must not exceed 5000 characters"))]
    pub message: Option<String>,
}

/// A chat message with its sender populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    #[serde(rename = "_id")]
    pub id:         Uuid,
    pub project_id: Uuid,
    pub sender:     Option<UserRef>,
    pub message:    String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessageResponse {
    pub fn populate(message: messages::Model, directory: &HashMap<Uuid, users::Model>) -> Self {
        Self {
            id:         message.id,
            project_id: message.project_id,
            sender:     directory.get(&message.sender).map(UserRef::contact),
            message:    message.text,
            created_at: message.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_alias() {
        let req: SendMessageRequest = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(req.message.as_deref(), Some("hello"));

        let req: SendMessageRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(req.message.is_none());
    }
}

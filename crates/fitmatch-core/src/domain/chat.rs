//! Chat message entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted message body, in characters
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// A message posted in a chat. A chat is identified by its matching id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(chat_id: Uuid, sender_id: Uuid, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat_id,
            sender_id,
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

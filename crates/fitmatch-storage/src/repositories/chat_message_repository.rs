//! SQLite implementation of ChatMessageRepository.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use fitmatch_core::{ChatMessage, ChatMessageRepository};
use rusqlite::params;
use tokio::sync::Mutex;

use crate::Database;

pub struct SqliteChatMessageRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteChatMessageRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChatMessageRepository for SqliteChatMessageRepository {
    async fn create(&self, message: &ChatMessage) -> Result<()> {
        let db = self.db.lock().await;
        db.connection().execute(
            "INSERT INTO chat_messages (id, chat_id, sender_id, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.id.to_string(),
                message.chat_id.to_string(),
                message.sender_id.to_string(),
                message.body,
                message.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

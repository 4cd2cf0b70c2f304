//! Chat service - messages between matched athletes

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{ChatMessage, DomainEvent, MAX_MESSAGE_LENGTH};
use crate::error::{keys, DomainError, DomainResult};
use crate::event_bus::EventSender;
use crate::repository::{ChatMessageRepository, MatchingRepository};

/// A chat is the message thread of an ACTIVE matching
pub struct ChatService {
    messages: Arc<dyn ChatMessageRepository>,
    matchings: Arc<dyn MatchingRepository>,
    event_sender: Option<EventSender>,
}

impl ChatService {
    pub fn new(
        messages: Arc<dyn ChatMessageRepository>,
        matchings: Arc<dyn MatchingRepository>,
    ) -> Self {
        Self {
            messages,
            matchings,
            event_sender: None,
        }
    }

    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    pub async fn send_message(
        &self,
        user_id: Uuid,
        chat_id: Uuid,
        body: &str,
    ) -> DomainResult<ChatMessage> {
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::validation(
                keys::INVALID_REQUEST,
                vec!["body must not be empty".to_string()],
            ));
        }
        if body.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(DomainError::validation(
                keys::INVALID_REQUEST,
                vec![format!(
                    "body must be at most {} characters",
                    MAX_MESSAGE_LENGTH
                )],
            ));
        }

        let recipient_id = self.open_chat(user_id, chat_id).await?;

        let message = ChatMessage::new(chat_id, user_id, body);
        self.messages.create(&message).await?;

        info!(
            message_id = %message.id,
            chat_id = %chat_id,
            sender_id = %user_id,
            recipient_id = %recipient_id,
            "[ChatService] Message sent"
        );
        if let Some(sender) = &self.event_sender {
            sender.emit(DomainEvent::MessageSent {
                message_id: message.id,
                chat_id,
                sender_id: user_id,
            });
        }

        Ok(message)
    }

    /// The other participant of an ACTIVE matching `user_id` belongs to
    async fn open_chat(&self, user_id: Uuid, chat_id: Uuid) -> DomainResult<Uuid> {
        let recipient = self
            .matchings
            .find_by_id_for_participant(&chat_id, &user_id)
            .await?
            .filter(|m| m.is_active())
            .and_then(|m| m.counterpart_of(&user_id));

        recipient.ok_or_else(|| {
            warn!(
                user_id = %user_id,
                chat_id = %chat_id,
                "[ChatService] Chat not available to user"
            );
            DomainError::DocumentNotFound(keys::CHAT_NOT_FOUND)
        })
    }
}

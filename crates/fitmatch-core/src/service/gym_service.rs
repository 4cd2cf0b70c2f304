//! Gym service

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{DomainEvent, Gym};
use crate::error::{keys, DomainError, DomainResult};
use crate::event_bus::EventSender;
use crate::repository::GymRepository;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGym {
    pub name: String,
    pub address: String,
    pub city: String,
}

impl CreateGym {
    pub fn validate(&self) -> Vec<String> {
        [("name", &self.name), ("address", &self.address), ("city", &self.city)]
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| format!("{} must not be empty", field))
            .collect()
    }
}

pub struct GymService {
    repository: Arc<dyn GymRepository>,
    event_sender: Option<EventSender>,
}

impl GymService {
    pub fn new(repository: Arc<dyn GymRepository>) -> Self {
        Self {
            repository,
            event_sender: None,
        }
    }

    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Register a gym; (name, city) is unique ignoring case
    pub async fn create(&self, user_id: Uuid, request: CreateGym) -> DomainResult<Gym> {
        let details = request.validate();
        if !details.is_empty() {
            return Err(DomainError::validation(keys::INVALID_REQUEST, details));
        }

        let (name, city) = (request.name.trim(), request.city.trim());
        if self
            .repository
            .find_by_name_and_city(name, city)
            .await?
            .is_some()
        {
            warn!(name = %name, city = %city, "[GymService] Gym already exists");
            return Err(DomainError::DocumentExists(keys::GYM_EXISTS));
        }

        let gym = Gym::new(name, request.address.trim(), city, user_id);
        self.repository.create(&gym).await?;

        info!(gym_id = %gym.id, name = %gym.name, "[GymService] Gym created");
        if let Some(sender) = &self.event_sender {
            sender.emit(DomainEvent::GymCreated {
                gym_id: gym.id,
                name: gym.name.clone(),
            });
        }

        Ok(gym)
    }
}

//! Athlete service - registration, login and like/dislike interactions

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{Athlete, DomainEvent, Experience, Gender, Interaction, WorkoutDay};
use crate::error::{keys, DomainError, DomainResult};
use crate::event_bus::EventSender;
use crate::repository::{AthleteRepository, InteractionRepository};

use super::matching_mapper::MatchingResponse;
use super::matching_service::MatchingService;
use super::password::{hash_password, verify_password};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAthlete {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub training_experience: Experience,
    #[serde(default)]
    pub training_days: Vec<WorkoutDay>,
}

impl RegisterAthlete {
    /// Collect every broken field rule
    pub fn validate(&self) -> Vec<String> {
        let mut details = Vec::new();

        if self.name.trim().is_empty() {
            details.push("name must not be empty".to_string());
        }
        if self.surname.trim().is_empty() {
            details.push("surname must not be empty".to_string());
        }
        if !is_plausible_email(&self.email) {
            details.push("email must be a valid address".to_string());
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            details.push(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }
        if self.birth_date >= Utc::now().date_naive() {
            details.push("birthDate must be in the past".to_string());
        }
        if self.training_days.is_empty() {
            details.push("trainingDays must contain at least one day".to_string());
        }

        details
    }
}

fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Public view of an athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteResponse {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub training_experience: Experience,
    pub training_days: Vec<WorkoutDay>,
    pub remaining_likes: u32,
    pub can_see_personal_trainers: bool,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Athlete> for AthleteResponse {
    fn from(athlete: &Athlete) -> Self {
        Self {
            id: athlete.id,
            name: athlete.name.clone(),
            surname: athlete.surname.clone(),
            email: athlete.email.clone(),
            gender: athlete.gender,
            birth_date: athlete.birth_date,
            training_experience: athlete.training_experience,
            training_days: athlete.training_days.clone(),
            remaining_likes: athlete.remaining_likes,
            can_see_personal_trainers: athlete.can_see_personal_trainers,
            is_premium: athlete.is_premium,
            created_at: athlete.created_at,
        }
    }
}

/// Result of a like or dislike
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionResponse {
    pub interaction: Interaction,
    pub remaining_likes: u32,
    /// Whether this like completed a mutual interest
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching: Option<MatchingResponse>,
}

/// Service for athlete accounts and their interactions
pub struct AthleteService {
    athletes: Arc<dyn AthleteRepository>,
    interactions: Arc<dyn InteractionRepository>,
    matching: Arc<MatchingService>,
    event_sender: Option<EventSender>,
}

impl AthleteService {
    pub fn new(
        athletes: Arc<dyn AthleteRepository>,
        interactions: Arc<dyn InteractionRepository>,
        matching: Arc<MatchingService>,
    ) -> Self {
        Self {
            athletes,
            interactions,
            matching,
            event_sender: None,
        }
    }

    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Register a new athlete
    pub async fn register(&self, request: RegisterAthlete) -> DomainResult<AthleteResponse> {
        let details = request.validate();
        if !details.is_empty() {
            return Err(DomainError::validation(keys::INVALID_REQUEST, details));
        }

        let email = request.email.trim().to_lowercase();
        if self.athletes.get_by_email(&email).await?.is_some() {
            warn!(email = %email, "[AthleteService] Email already registered");
            return Err(DomainError::DocumentExists(keys::USER_EXISTS));
        }

        let password_hash = hash_password(&request.password)?;
        let athlete = Athlete::new(
            request.name.trim(),
            request.surname.trim(),
            email,
            password_hash,
            request.gender,
            request.birth_date,
            request.training_experience,
            request.training_days,
        );
        self.athletes.create(&athlete).await?;

        info!(athlete_id = %athlete.id, "[AthleteService] Athlete registered");
        self.emit(DomainEvent::AthleteRegistered {
            athlete_id: athlete.id,
        });

        Ok(AthleteResponse::from(&athlete))
    }

    /// Check credentials, returning the athlete on success
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<Athlete> {
        let email = email.trim().to_lowercase();
        let Some(athlete) = self.athletes.get_by_email(&email).await? else {
            debug!("[AthleteService] Login for unknown email");
            return Err(DomainError::Unauthorized(keys::INVALID_CREDENTIALS));
        };

        if !verify_password(password, &athlete.password_hash) {
            warn!(athlete_id = %athlete.id, "[AthleteService] Invalid password");
            return Err(DomainError::Unauthorized(keys::INVALID_CREDENTIALS));
        }

        Ok(athlete)
    }

    pub async fn get(&self, athlete_id: &Uuid) -> DomainResult<Option<AthleteResponse>> {
        Ok(self
            .athletes
            .get(athlete_id)
            .await?
            .as_ref()
            .map(AthleteResponse::from))
    }

    /// Like `target_id`. A like answered by an earlier like from the target
    /// creates a matching between the two.
    pub async fn like(&self, athlete_id: Uuid, target_id: Uuid) -> DomainResult<InteractionResponse> {
        let (mut athlete, _target) = self.load_pair(athlete_id, target_id).await?;

        if !athlete.can_like() {
            warn!(athlete_id = %athlete_id, "[AthleteService] Like budget exhausted");
            return Err(DomainError::validation(
                keys::LIKE_LIMIT_EXCEEDED,
                vec!["no likes remaining, upgrade to premium for unlimited likes".to_string()],
            ));
        }

        let interaction = Interaction::like(athlete_id, target_id);
        self.record(&interaction).await?;

        athlete.spend_like();
        self.athletes.update(&athlete).await?;

        info!(
            athlete_id = %athlete_id,
            target_id = %target_id,
            remaining_likes = athlete.remaining_likes,
            "[AthleteService] Athlete liked"
        );
        self.emit(DomainEvent::AthleteLiked {
            athlete_id,
            target_id,
        });

        let reciprocal = self
            .interactions
            .find(&target_id, &athlete_id)
            .await?
            .is_some_and(|i| i.is_like());

        let matching = if reciprocal {
            match self.matching.match_athletes(target_id, athlete_id).await {
                Ok(matching) => Some(matching),
                Err(DomainError::DocumentExists(_)) => {
                    debug!(
                        athlete_id = %athlete_id,
                        target_id = %target_id,
                        "[AthleteService] Pair already matched"
                    );
                    None
                }
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        Ok(InteractionResponse {
            interaction,
            remaining_likes: athlete.remaining_likes,
            matched: matching.is_some(),
            matching,
        })
    }

    /// Dislike `target_id`. Does not consume the like budget.
    pub async fn dislike(
        &self,
        athlete_id: Uuid,
        target_id: Uuid,
    ) -> DomainResult<InteractionResponse> {
        let (athlete, _target) = self.load_pair(athlete_id, target_id).await?;

        let interaction = Interaction::dislike(athlete_id, target_id);
        self.record(&interaction).await?;

        info!(
            athlete_id = %athlete_id,
            target_id = %target_id,
            "[AthleteService] Athlete disliked"
        );
        self.emit(DomainEvent::AthleteDisliked {
            athlete_id,
            target_id,
        });

        Ok(InteractionResponse {
            interaction,
            remaining_likes: athlete.remaining_likes,
            matched: false,
            matching: None,
        })
    }

    /// Insert `interaction`; a concurrent request may have recorded the pair
    /// after `load_pair` checked it
    async fn record(&self, interaction: &Interaction) -> DomainResult<()> {
        if self.interactions.create(interaction).await? {
            return Ok(());
        }
        warn!(
            athlete_id = %interaction.interacting_user,
            target_id = %interaction.interacted_user,
            "[AthleteService] Interaction recorded concurrently"
        );
        Err(DomainError::DocumentExists(keys::INTERACTION_EXISTS))
    }

    /// Shared checks for like/dislike: both exist, distinct, no prior interaction
    async fn load_pair(&self, athlete_id: Uuid, target_id: Uuid) -> DomainResult<(Athlete, Athlete)> {
        if athlete_id == target_id {
            return Err(DomainError::validation(
                keys::INTERACTION_SELF,
                vec!["athletes cannot interact with themselves".to_string()],
            ));
        }

        let athlete = self
            .athletes
            .get(&athlete_id)
            .await?
            .ok_or(DomainError::DocumentNotFound(keys::USER_NOT_FOUND))?;
        let target = self.athletes.get(&target_id).await?.ok_or_else(|| {
            warn!(target_id = %target_id, "[AthleteService] Target athlete not found");
            DomainError::DocumentNotFound(keys::USER_NOT_FOUND)
        })?;

        if self.interactions.find(&athlete_id, &target_id).await?.is_some() {
            warn!(
                athlete_id = %athlete_id,
                target_id = %target_id,
                "[AthleteService] Interaction already recorded"
            );
            return Err(DomainError::DocumentExists(keys::INTERACTION_EXISTS));
        }

        Ok((athlete, target))
    }

    fn emit(&self, event: DomainEvent) {
        if let Some(sender) = &self.event_sender {
            sender.emit(event);
        }
    }
}

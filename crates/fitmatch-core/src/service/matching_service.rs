//! Matching service - creation and closing of matchings between athletes

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{DomainEvent, Matching, PairKey};
use crate::error::{keys, DomainError, DomainResult};
use crate::event_bus::EventSender;
use crate::repository::MatchingRepository;

use super::matching_mapper::{MatchingMapper, MatchingResponse};

/// How the "already matched" check treats the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateCheckMode {
    /// An ACTIVE matching in either orientation blocks a new one
    #[default]
    Symmetric,
    /// Historical behaviour: the check never finds anything, duplicates go through
    ///
    /// This reads the misspelled counterpart field as an exact-match filter no
    /// record satisfies. A store that strips unknown filter keys (strict query
    /// mode) would instead run the remaining `{interacting_user, status}`
    /// filter, blocking on any ACTIVE matching the first athlete initiated
    /// with anyone. That reading is not implemented.
    Legacy,
}

impl DuplicateCheckMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "symmetric" => Some(Self::Symmetric),
            "legacy" => Some(Self::Legacy),
            _ => None,
        }
    }
}

/// Whether check-then-create is serialized per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchCreationMode {
    #[default]
    PerPairLock,
    /// No coordination; concurrent calls for one pair may both create
    Unguarded,
}

impl MatchCreationMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per_pair_lock" | "per-pair-lock" | "lock" => Some(Self::PerPairLock),
            "unguarded" => Some(Self::Unguarded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchingOptions {
    pub duplicate_check: DuplicateCheckMode,
    pub creation: MatchCreationMode,
}

/// Service for creating and unlinking matchings
pub struct MatchingService {
    repository: Arc<dyn MatchingRepository>,
    options: MatchingOptions,
    pair_locks: DashMap<PairKey, Arc<Mutex<()>>>,
    event_sender: Option<EventSender>,
}

impl MatchingService {
    pub fn new(repository: Arc<dyn MatchingRepository>, options: MatchingOptions) -> Self {
        Self {
            repository,
            options,
            pair_locks: DashMap::new(),
            event_sender: None,
        }
    }

    /// Emit [`DomainEvent::MatchCreated`] / [`DomainEvent::MatchClosed`] on `sender`
    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    pub fn options(&self) -> MatchingOptions {
        self.options
    }

    /// Create an ACTIVE matching between `interacted_user` and `interacting_user`.
    ///
    /// Fails with `matching.exists` when the pair already has an ACTIVE matching
    /// (subject to [`DuplicateCheckMode`]); nothing is written in that case.
    pub async fn match_athletes(
        &self,
        interacted_user: Uuid,
        interacting_user: Uuid,
    ) -> DomainResult<MatchingResponse> {
        match self.options.creation {
            MatchCreationMode::Unguarded => {
                self.check_and_create(interacted_user, interacting_user).await
            }
            MatchCreationMode::PerPairLock => {
                let key = PairKey::new(interacted_user, interacting_user);
                let lock = self
                    .pair_locks
                    .entry(key)
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone();

                let result = {
                    let _guard = lock.lock().await;
                    self.check_and_create(interacted_user, interacting_user).await
                };

                drop(lock);
                self.pair_locks
                    .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);

                result
            }
        }
    }

    async fn check_and_create(
        &self,
        interacted_user: Uuid,
        interacting_user: Uuid,
    ) -> DomainResult<MatchingResponse> {
        if self
            .has_active_match(&interacted_user, &interacting_user)
            .await?
        {
            warn!(
                interacted_user = %interacted_user,
                interacting_user = %interacting_user,
                "[MatchingService] Active matching already exists for pair"
            );
            return Err(DomainError::DocumentExists(keys::MATCHING_EXISTS));
        }

        let matching = Matching::new(interacted_user, interacting_user);
        self.repository.create(&matching).await?;

        info!(
            matching_id = %matching.id,
            interacted_user = %interacted_user,
            interacting_user = %interacting_user,
            "[MatchingService] Matching created"
        );

        self.emit(DomainEvent::MatchCreated {
            matching_id: matching.id,
            interacted_user,
            interacting_user,
        });

        Ok(MatchingMapper::to_response(&matching))
    }

    /// Close a matching on behalf of one of its participants.
    ///
    /// A matching the user does not participate in is reported as
    /// `matching.notFound`, same as a missing one. Closing an already
    /// closed matching succeeds and leaves it CLOSED.
    pub async fn unlink(&self, user_id: Uuid, matching_id: Uuid) -> DomainResult<MatchingResponse> {
        let Some(mut matching) = self
            .repository
            .find_by_id_for_participant(&matching_id, &user_id)
            .await?
        else {
            warn!(
                user_id = %user_id,
                matching_id = %matching_id,
                "[MatchingService] Matching not found for participant"
            );
            return Err(DomainError::DocumentNotFound(keys::MATCHING_NOT_FOUND));
        };

        if matching.close() {
            self.repository.update(&matching).await?;
            self.emit(DomainEvent::MatchClosed {
                matching_id,
                closed_by: user_id,
            });
        } else {
            debug!(
                matching_id = %matching_id,
                "[MatchingService] Matching was already closed"
            );
        }

        info!(
            user_id = %user_id,
            matching_id = %matching_id,
            "[MatchingService] Matching unlinked"
        );

        Ok(MatchingMapper::to_response(&matching))
    }

    /// Whether `first` and `second` currently share an ACTIVE matching
    pub async fn has_active_match(&self, first: &Uuid, second: &Uuid) -> DomainResult<bool> {
        match self.options.duplicate_check {
            DuplicateCheckMode::Symmetric => Ok(self
                .repository
                .find_active_between(first, second)
                .await?
                .is_some()),
            DuplicateCheckMode::Legacy => {
                debug!(
                    first = %first,
                    second = %second,
                    "[MatchingService] Legacy duplicate check, skipping lookup"
                );
                Ok(false)
            }
        }
    }

    fn emit(&self, event: DomainEvent) {
        if let Some(sender) = &self.event_sender {
            sender.emit(event);
        }
    }
}

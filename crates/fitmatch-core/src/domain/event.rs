//! Domain Events - facts emitted by services after successful writes
//!
//! Consumers (audit logging, notification fan-out) subscribe through the
//! [`EventBus`](crate::event_bus::EventBus) and decide which events they
//! care about.
//!
//! Events serialize with a `type` field containing the snake_case variant name:
//! ```json
//! { "type": "match_created", "matching_id": "...", "interacted_user": "..." }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    // ════════════════════════════════════════════════════════════════════════
    // ATHLETES
    // ════════════════════════════════════════════════════════════════════════
    /// A new athlete registered
    AthleteRegistered { athlete_id: Uuid },

    /// An athlete liked another athlete
    AthleteLiked { athlete_id: Uuid, target_id: Uuid },

    /// An athlete disliked another athlete
    AthleteDisliked { athlete_id: Uuid, target_id: Uuid },

    // ════════════════════════════════════════════════════════════════════════
    // MATCHING
    // ════════════════════════════════════════════════════════════════════════
    /// A new ACTIVE matching was created
    MatchCreated {
        matching_id: Uuid,
        interacted_user: Uuid,
        interacting_user: Uuid,
    },

    /// A participant unlinked a matching
    MatchClosed { matching_id: Uuid, closed_by: Uuid },

    // ════════════════════════════════════════════════════════════════════════
    // SUBSCRIPTIONS
    // ════════════════════════════════════════════════════════════════════════
    SubscriptionActivated {
        subscription_id: Uuid,
        user_id: Uuid,
        package_name: String,
    },

    SubscriptionCancelled {
        subscription_id: Uuid,
        user_id: Uuid,
        package_name: String,
    },

    PremiumPackageCreated { package_id: Uuid, name: String },

    // ════════════════════════════════════════════════════════════════════════
    // CHAT & GYMS
    // ════════════════════════════════════════════════════════════════════════
    MessageSent {
        message_id: Uuid,
        chat_id: Uuid,
        sender_id: Uuid,
    },

    GymCreated { gym_id: Uuid, name: String },
}

impl DomainEvent {
    /// Get the event type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::AthleteRegistered { .. } => "athlete_registered",
            Self::AthleteLiked { .. } => "athlete_liked",
            Self::AthleteDisliked { .. } => "athlete_disliked",
            Self::MatchCreated { .. } => "match_created",
            Self::MatchClosed { .. } => "match_closed",
            Self::SubscriptionActivated { .. } => "subscription_activated",
            Self::SubscriptionCancelled { .. } => "subscription_cancelled",
            Self::PremiumPackageCreated { .. } => "premium_package_created",
            Self::MessageSent { .. } => "message_sent",
            Self::GymCreated { .. } => "gym_created",
        }
    }

    /// Get the matching id if this event is matching-scoped
    pub fn matching_id(&self) -> Option<Uuid> {
        match self {
            Self::MatchCreated { matching_id, .. } | Self::MatchClosed { matching_id, .. } => {
                Some(*matching_id)
            }
            Self::MessageSent { chat_id, .. } => Some(*chat_id),
            _ => None,
        }
    }

    /// Users whose view of the system changed because of this event
    pub fn affected_users(&self) -> Vec<Uuid> {
        match self {
            Self::AthleteRegistered { athlete_id } => vec![*athlete_id],
            Self::AthleteLiked {
                athlete_id,
                target_id,
            }
            | Self::AthleteDisliked {
                athlete_id,
                target_id,
            } => vec![*athlete_id, *target_id],
            Self::MatchCreated {
                interacted_user,
                interacting_user,
                ..
            } => vec![*interacted_user, *interacting_user],
            Self::MatchClosed { closed_by, .. } => vec![*closed_by],
            Self::SubscriptionActivated { user_id, .. }
            | Self::SubscriptionCancelled { user_id, .. } => vec![*user_id],
            Self::MessageSent { sender_id, .. } => vec![*sender_id],
            Self::PremiumPackageCreated { .. } | Self::GymCreated { .. } => Vec::new(),
        }
    }
}

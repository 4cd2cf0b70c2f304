//! Matching entity - mutual interest between two athletes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a matching.
///
/// `Closed` is terminal: a closed matching is never reactivated, a fresh
/// match between the same pair is a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchingStatus {
    #[default]
    Active,
    Closed,
}

impl MatchingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Closed => "CLOSED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for MatchingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order-insensitive key for a pair of users.
///
/// `PairKey::new(a, b) == PairKey::new(b, a)` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey(Uuid, Uuid);

impl PairKey {
    pub fn new(first: Uuid, second: Uuid) -> Self {
        if first <= second {
            Self(first, second)
        } else {
            Self(second, first)
        }
    }
}

/// A matching between two athletes.
///
/// `interacting_user` is the athlete whose like completed the mutual
/// interest; `interacted_user` is the other side. The order is informative
/// only, pair equality is checked with [`Matching::is_between`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matching {
    pub id: Uuid,
    pub interacted_user: Uuid,
    pub interacting_user: Uuid,
    pub status: MatchingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Matching {
    /// Create a new ACTIVE matching
    pub fn new(interacted_user: Uuid, interacting_user: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            interacted_user,
            interacting_user,
            status: MatchingStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MatchingStatus::Active
    }

    /// Whether `user_id` is one of the two participants
    pub fn involves(&self, user_id: &Uuid) -> bool {
        self.interacted_user == *user_id || self.interacting_user == *user_id
    }

    /// Whether this matching links `first` and `second`, in either orientation
    pub fn is_between(&self, first: &Uuid, second: &Uuid) -> bool {
        self.pair_key() == PairKey::new(*first, *second)
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.interacted_user, self.interacting_user)
    }

    /// The participant that is not `user_id`
    pub fn counterpart_of(&self, user_id: &Uuid) -> Option<Uuid> {
        if !self.involves(user_id) {
            return None;
        }
        if self.interacted_user == *user_id {
            Some(self.interacting_user)
        } else {
            Some(self.interacted_user)
        }
    }

    /// Move to CLOSED. Returns `false` if the matching was already closed.
    pub fn close(&mut self) -> bool {
        if self.status == MatchingStatus::Closed {
            return false;
        }
        self.status = MatchingStatus::Closed;
        self.updated_at = Utc::now();
        true
    }
}

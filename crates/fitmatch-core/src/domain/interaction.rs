//! Interaction entity - a like or dislike between athletes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionKind {
    Like,
    Dislike,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Dislike => "DISLIKE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LIKE" => Some(Self::Like),
            "DISLIKE" => Some(Self::Dislike),
            _ => None,
        }
    }
}

/// One athlete's reaction to another.
///
/// At most one interaction exists per ordered (interacting, interacted) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    /// Athlete who reacted
    pub interacting_user: Uuid,
    /// Athlete who was reacted to
    pub interacted_user: Uuid,
    pub kind: InteractionKind,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    pub fn new(interacting_user: Uuid, interacted_user: Uuid, kind: InteractionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            interacting_user,
            interacted_user,
            kind,
            created_at: Utc::now(),
        }
    }

    pub fn like(interacting_user: Uuid, interacted_user: Uuid) -> Self {
        Self::new(interacting_user, interacted_user, InteractionKind::Like)
    }

    pub fn dislike(interacting_user: Uuid, interacted_user: Uuid) -> Self {
        Self::new(interacting_user, interacted_user, InteractionKind::Dislike)
    }

    pub fn is_like(&self) -> bool {
        self.kind == InteractionKind::Like
    }
}

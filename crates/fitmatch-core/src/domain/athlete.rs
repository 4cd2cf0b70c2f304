//! Athlete entity - a registered user looking for training partners

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of likes a non-premium athlete starts with
pub const DEFAULT_LIKE_BUDGET: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Experience {
    Beginner,
    Intermediate,
    Advanced,
}

impl Experience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "BEGINNER",
            Self::Intermediate => "INTERMEDIATE",
            Self::Advanced => "ADVANCED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BEGINNER" => Some(Self::Beginner),
            "INTERMEDIATE" => Some(Self::Intermediate),
            "ADVANCED" => Some(Self::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "MALE",
            Self::Female => "FEMALE",
            Self::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MALE" => Some(Self::Male),
            "FEMALE" => Some(Self::Female),
            "OTHER" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkoutDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WorkoutDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "MONDAY",
            Self::Tuesday => "TUESDAY",
            Self::Wednesday => "WEDNESDAY",
            Self::Thursday => "THURSDAY",
            Self::Friday => "FRIDAY",
            Self::Saturday => "SATURDAY",
            Self::Sunday => "SUNDAY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MONDAY" => Some(Self::Monday),
            "TUESDAY" => Some(Self::Tuesday),
            "WEDNESDAY" => Some(Self::Wednesday),
            "THURSDAY" => Some(Self::Thursday),
            "FRIDAY" => Some(Self::Friday),
            "SATURDAY" => Some(Self::Saturday),
            "SUNDAY" => Some(Self::Sunday),
            _ => None,
        }
    }
}

/// Athlete user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Athlete {
    /// Unique identifier
    pub id: Uuid,

    pub name: String,

    pub surname: String,

    /// Login email, unique across athletes (stored lowercase)
    pub email: String,

    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub gender: Gender,

    pub birth_date: NaiveDate,

    pub training_experience: Experience,

    pub training_days: Vec<WorkoutDay>,

    /// Likes left for a non-premium athlete
    pub remaining_likes: u32,

    pub can_see_personal_trainers: bool,

    pub is_premium: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Athlete {
    /// Create a new athlete with default like budget and no premium access
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        gender: Gender,
        birth_date: NaiveDate,
        training_experience: Experience,
        training_days: Vec<WorkoutDay>,
    ) -> Self {
        let now = Utc::now();
        let mut training_days = training_days;
        training_days.sort();
        training_days.dedup();

        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            surname: surname.into(),
            email: email.into().to_lowercase(),
            password_hash: password_hash.into(),
            gender,
            birth_date,
            training_experience,
            training_days,
            remaining_likes: DEFAULT_LIKE_BUDGET,
            can_see_personal_trainers: false,
            is_premium: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the athlete may send another like
    pub fn can_like(&self) -> bool {
        self.is_premium || self.remaining_likes > 0
    }

    /// Spend one like. Premium athletes are not metered.
    pub fn spend_like(&mut self) {
        if !self.is_premium {
            self.remaining_likes = self.remaining_likes.saturating_sub(1);
        }
        self.updated_at = Utc::now();
    }

    /// Grant or revoke premium access
    pub fn set_premium(&mut self, premium: bool) {
        self.is_premium = premium;
        self.can_see_personal_trainers = premium;
        self.updated_at = Utc::now();
    }
}

//! Gym entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gym {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    /// Athlete who registered the gym
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Gym {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            city: city.into(),
            created_by,
            created_at: Utc::now(),
        }
    }
}

//! Subscription and premium package entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A user's subscription to a premium package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub package_name: String,
    pub status: SubscriptionStatus,
    /// Subscription id at the billing provider
    pub provider_subscription_id: Option<String>,
    /// Customer id at the billing provider
    pub provider_customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Subscription {
    pub fn new(user_id: Uuid, package_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            package_name: package_name.into(),
            status: SubscriptionStatus::Active,
            provider_subscription_id: None,
            provider_customer_id: None,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        }
    }

    pub fn with_provider_ids(
        mut self,
        subscription_id: Option<String>,
        customer_id: Option<String>,
    ) -> Self {
        self.provider_subscription_id = subscription_id;
        self.provider_customer_id = customer_id;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    pub fn cancel(&mut self) {
        let now = Utc::now();
        self.status = SubscriptionStatus::Cancelled;
        self.cancelled_at = Some(now);
        self.updated_at = now;
    }
}

/// A paid plan athletes can subscribe to.
///
/// `lookup_key` is the key the billing provider resolves to a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumPackage {
    pub id: Uuid,
    pub name: String,
    pub lookup_key: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl PremiumPackage {
    pub fn new(
        name: impl Into<String>,
        lookup_key: impl Into<String>,
        price_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            lookup_key: lookup_key.into(),
            description: None,
            price_cents,
            currency: currency.into().to_lowercase(),
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

//! Billing provider abstraction
//!
//! The gateway ships a Stripe implementation; tests use in-memory fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainResult;

/// A hosted checkout session the client is redirected to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// What happened to an incoming webhook event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The event changed local state
    Processed { event_type: String },
    /// The event was verified but has no handler
    Ignored { event_type: String },
}

impl WebhookOutcome {
    pub fn event_type(&self) -> &str {
        match self {
            Self::Processed { event_type } | Self::Ignored { event_type } => event_type,
        }
    }
}

#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// Open a subscription checkout for `lookup_key` on behalf of a user
    async fn create_session(
        &self,
        user_id: Uuid,
        email: &str,
        lookup_key: &str,
    ) -> DomainResult<CheckoutSession>;

    /// Verify and apply a raw webhook delivery
    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> DomainResult<WebhookOutcome>;
}

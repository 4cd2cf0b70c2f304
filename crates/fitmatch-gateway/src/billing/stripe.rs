//! Stripe billing provider
//!
//! Checkout sessions go through the REST API with form-encoded bodies.
//! Webhooks are verified with [`verify_signature`] before anything is parsed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fitmatch_core::{
    keys, BillingProvider, CheckoutSession, DomainError, DomainResult, SubscriptionService,
    WebhookOutcome,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::signature::{verify_signature, DEFAULT_TOLERANCE_SECS};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Connection settings for the Stripe account
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub api_base: String,
    pub secret_key: String,
    pub webhook_secret: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            secret_key: secret_key.into(),
            webhook_secret: webhook_secret.into(),
            success_url: "http://localhost:3000/subscriptions/success".to_string(),
            cancel_url: "http://localhost:3000/subscriptions/cancel".to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_redirects(mut self, success_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        self.success_url = success_url.into();
        self.cancel_url = cancel_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct PriceList {
    data: Vec<Price>,
}

#[derive(Debug, Deserialize)]
struct Price {
    id: String,
}

#[derive(Debug, Deserialize)]
struct WebhookEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: WebhookData,
}

#[derive(Debug, Deserialize)]
struct WebhookData {
    object: Value,
}

pub struct StripeBillingProvider {
    config: StripeConfig,
    client: reqwest::Client,
    subscriptions: Arc<SubscriptionService>,
}

impl StripeBillingProvider {
    pub fn new(config: StripeConfig, subscriptions: Arc<SubscriptionService>) -> anyhow::Result<Self> {
        for (name, value) in [
            ("api_base", &config.api_base),
            ("success_url", &config.success_url),
            ("cancel_url", &config.cancel_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| anyhow::anyhow!("Invalid Stripe {} '{}': {}", name, value, e))?;
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("{}/1.0", fitmatch_core::branding::DISPLAY_NAME))
            .build()?;

        Ok(Self {
            config,
            client,
            subscriptions,
        })
    }

    async fn resolve_price(&self, lookup_key: &str) -> DomainResult<String> {
        let url = format!("{}/v1/prices", self.config.api_base);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.secret_key)
            .query(&[("lookup_keys[]", lookup_key)])
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "[Stripe] Price lookup failed");
            return Err(DomainError::billing(
                keys::BILLING_UNAVAILABLE,
                format!("price lookup returned {}", status),
            ));
        }

        let prices: PriceList = response.json().await.map_err(unavailable)?;
        match prices.data.into_iter().next() {
            Some(price) => Ok(price.id),
            None => {
                warn!(lookup_key = %lookup_key, "[Stripe] No price for lookup key");
                Err(DomainError::DocumentNotFound(keys::PACKAGE_NOT_FOUND))
            }
        }
    }

    async fn on_checkout_completed(&self, session: &Value) -> DomainResult<()> {
        let user_id = session
            .get("client_reference_id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| malformed("client_reference_id"))?;
        let package_name = session
            .pointer("/metadata/package_name")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("metadata.package_name"))?;
        let provider_subscription = session
            .get("subscription")
            .and_then(Value::as_str)
            .map(String::from);
        let provider_customer = session
            .get("customer")
            .and_then(Value::as_str)
            .map(String::from);

        self.subscriptions
            .activate(user_id, package_name, provider_subscription, provider_customer)
            .await?;
        Ok(())
    }

    async fn on_subscription_deleted(&self, subscription: &Value) -> DomainResult<()> {
        let provider_id = subscription
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("id"))?;
        self.subscriptions.cancel_by_provider_id(provider_id).await?;
        Ok(())
    }
}

#[async_trait]
impl BillingProvider for StripeBillingProvider {
    async fn create_session(
        &self,
        user_id: Uuid,
        email: &str,
        lookup_key: &str,
    ) -> DomainResult<CheckoutSession> {
        let price_id = self.resolve_price(lookup_key).await?;
        let user_ref = user_id.to_string();

        let url = format!("{}/v1/checkout/sessions", self.config.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.secret_key)
            .form(&[
                ("mode", "subscription"),
                ("client_reference_id", user_ref.as_str()),
                ("customer_email", email),
                ("line_items[0][price]", price_id.as_str()),
                ("line_items[0][quantity]", "1"),
                ("metadata[package_name]", lookup_key),
                ("success_url", self.config.success_url.as_str()),
                ("cancel_url", self.config.cancel_url.as_str()),
            ])
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "[Stripe] Checkout session rejected");
            return Err(DomainError::billing(
                keys::BILLING_UNAVAILABLE,
                format!("checkout session returned {}", status),
            ));
        }

        let session: CheckoutSession = response.json().await.map_err(unavailable)?;
        info!(
            session_id = %session.id,
            user_id = %user_id,
            lookup_key = %lookup_key,
            "[Stripe] Checkout session created"
        );
        Ok(session)
    }

    async fn handle_webhook(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> DomainResult<WebhookOutcome> {
        let signature = signature
            .ok_or_else(|| DomainError::billing(keys::INVALID_SIGNATURE, "missing signature header"))?;
        verify_signature(
            payload,
            signature,
            &self.config.webhook_secret,
            DEFAULT_TOLERANCE_SECS,
            chrono::Utc::now().timestamp(),
        )?;

        let event: WebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            DomainError::validation(keys::INVALID_REQUEST, vec![format!("invalid event: {}", e)])
        })?;
        let event_type = event.event_type;

        match event_type.as_str() {
            "checkout.session.completed" => self.on_checkout_completed(&event.data.object).await?,
            "customer.subscription.deleted" => {
                self.on_subscription_deleted(&event.data.object).await?
            }
            _ => {
                debug!(event_type = %event_type, "[Stripe] Ignoring webhook event");
                return Ok(WebhookOutcome::Ignored { event_type });
            }
        }

        info!(event_type = %event_type, "[Stripe] Webhook processed");
        Ok(WebhookOutcome::Processed { event_type })
    }
}

fn unavailable(e: reqwest::Error) -> DomainError {
    warn!(error = %e, "[Stripe] Request failed");
    DomainError::billing(keys::BILLING_UNAVAILABLE, e.to_string())
}

fn malformed(field: &str) -> DomainError {
    DomainError::validation(
        keys::INVALID_REQUEST,
        vec![format!("event object is missing {}", field)],
    )
}

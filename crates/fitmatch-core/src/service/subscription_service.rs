//! Subscription service - premium subscriptions and packages

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{DomainEvent, PremiumPackage, Subscription};
use crate::error::{keys, DomainError, DomainResult};
use crate::event_bus::EventSender;
use crate::repository::{AthleteRepository, PremiumPackageRepository, SubscriptionRepository};

/// Payload for a new premium package
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePremiumPackage {
    pub name: String,
    /// Defaults to the package name
    #[serde(default)]
    pub lookup_key: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "usd".to_string()
}

impl CreatePremiumPackage {
    pub fn validate(&self) -> Vec<String> {
        let mut details = Vec::new();
        if self.name.trim().is_empty() {
            details.push("name must not be empty".to_string());
        }
        if self.price_cents <= 0 {
            details.push("priceCents must be positive".to_string());
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            details.push("currency must be a three-letter ISO code".to_string());
        }
        details
    }
}

/// Service for premium subscriptions
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    packages: Arc<dyn PremiumPackageRepository>,
    athletes: Arc<dyn AthleteRepository>,
    event_sender: Option<EventSender>,
}

impl SubscriptionService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        packages: Arc<dyn PremiumPackageRepository>,
        athletes: Arc<dyn AthleteRepository>,
    ) -> Self {
        Self {
            subscriptions,
            packages,
            athletes,
            event_sender: None,
        }
    }

    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Record a paid subscription and grant premium access.
    ///
    /// Repeated deliveries for the same provider subscription (or an already
    /// active user/package pair) return the existing record.
    pub async fn activate(
        &self,
        user_id: Uuid,
        package_name: &str,
        provider_subscription_id: Option<String>,
        provider_customer_id: Option<String>,
    ) -> DomainResult<Subscription> {
        if let Some(provider_id) = provider_subscription_id.as_deref() {
            if let Some(existing) = self.subscriptions.find_by_provider_id(provider_id).await? {
                info!(
                    subscription_id = %existing.id,
                    "[SubscriptionService] Subscription already recorded"
                );
                return Ok(existing);
            }
        }
        if let Some(existing) = self.subscriptions.find_active(&user_id, package_name).await? {
            return Ok(existing);
        }

        let mut athlete = self
            .athletes
            .get(&user_id)
            .await?
            .ok_or(DomainError::DocumentNotFound(keys::USER_NOT_FOUND))?;

        let subscription = Subscription::new(user_id, package_name)
            .with_provider_ids(provider_subscription_id, provider_customer_id);
        self.subscriptions.create(&subscription).await?;

        athlete.set_premium(true);
        self.athletes.update(&athlete).await?;

        info!(
            subscription_id = %subscription.id,
            user_id = %user_id,
            package = %package_name,
            "[SubscriptionService] Subscription activated"
        );
        self.emit(DomainEvent::SubscriptionActivated {
            subscription_id: subscription.id,
            user_id,
            package_name: subscription.package_name.clone(),
        });

        Ok(subscription)
    }

    /// Cancel a user's ACTIVE subscription to `package_name`
    pub async fn unsubscribe(&self, user_id: Uuid, package_name: &str) -> DomainResult<Subscription> {
        let Some(subscription) = self.subscriptions.find_active(&user_id, package_name).await? else {
            warn!(
                user_id = %user_id,
                package = %package_name,
                "[SubscriptionService] No active subscription to cancel"
            );
            return Err(DomainError::DocumentNotFound(keys::SUBSCRIPTION_NOT_FOUND));
        };

        self.cancel(subscription).await
    }

    /// Cancel by billing provider id. Unknown ids are reported as `None`.
    pub async fn cancel_by_provider_id(
        &self,
        provider_subscription_id: &str,
    ) -> DomainResult<Option<Subscription>> {
        match self
            .subscriptions
            .find_by_provider_id(provider_subscription_id)
            .await?
        {
            Some(subscription) if subscription.is_active() => {
                Ok(Some(self.cancel(subscription).await?))
            }
            Some(subscription) => Ok(Some(subscription)),
            None => {
                warn!(
                    provider_subscription_id = %provider_subscription_id,
                    "[SubscriptionService] Unknown provider subscription"
                );
                Ok(None)
            }
        }
    }

    async fn cancel(&self, mut subscription: Subscription) -> DomainResult<Subscription> {
        subscription.cancel();
        self.subscriptions.update(&subscription).await?;

        let user_id = subscription.user_id;
        if self.subscriptions.count_active_for_user(&user_id).await? == 0 {
            if let Some(mut athlete) = self.athletes.get(&user_id).await? {
                athlete.set_premium(false);
                self.athletes.update(&athlete).await?;
            }
        }

        info!(
            subscription_id = %subscription.id,
            user_id = %user_id,
            package = %subscription.package_name,
            "[SubscriptionService] Subscription cancelled"
        );
        self.emit(DomainEvent::SubscriptionCancelled {
            subscription_id: subscription.id,
            user_id,
            package_name: subscription.package_name.clone(),
        });

        Ok(subscription)
    }

    pub async fn create_premium_package(
        &self,
        request: CreatePremiumPackage,
    ) -> DomainResult<PremiumPackage> {
        let details = request.validate();
        if !details.is_empty() {
            return Err(DomainError::validation(keys::INVALID_REQUEST, details));
        }

        let name = request.name.trim();
        if self.packages.get_by_name(name).await?.is_some() {
            warn!(name = %name, "[SubscriptionService] Package already exists");
            return Err(DomainError::DocumentExists(keys::PACKAGE_EXISTS));
        }

        let lookup_key = request
            .lookup_key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| name.to_string());
        let mut package = PremiumPackage::new(name, lookup_key, request.price_cents, request.currency);
        if let Some(description) = request.description {
            package = package.with_description(description);
        }
        self.packages.create(&package).await?;

        info!(
            package_id = %package.id,
            name = %package.name,
            "[SubscriptionService] Premium package created"
        );
        self.emit(DomainEvent::PremiumPackageCreated {
            package_id: package.id,
            name: package.name.clone(),
        });

        Ok(package)
    }

    pub async fn list_packages(&self) -> DomainResult<Vec<PremiumPackage>> {
        Ok(self.packages.list().await?)
    }

    fn emit(&self, event: DomainEvent) {
        if let Some(sender) = &self.event_sender {
            sender.emit(event);
        }
    }
}

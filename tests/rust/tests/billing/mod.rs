//! Billing integration tests
//!
//! The Stripe provider talks to a wiremock server standing in for the API.


use std::sync::Arc;

use fitmatch_core::SubscriptionService;
use fitmatch_gateway::{StripeBillingProvider, StripeConfig};
use tests::mocks::MockRepositories;

pub const SECRET_KEY: &str = "sk_test_billing";
pub const WEBHOOK_SECRET: &str = "whsec_billing";

/// A provider pointed at `api_base`, plus the repositories behind it
pub fn provider(api_base: &str) -> (StripeBillingProvider, MockRepositories) {
    tests::logging::init();
    let repos = MockRepositories::new();
    let subscriptions = Arc::new(SubscriptionService::new(
        repos.subscriptions.clone(),
        repos.packages.clone(),
        repos.athletes.clone(),
    ));
    let config = StripeConfig::new(SECRET_KEY, WEBHOOK_SECRET)
        .with_api_base(api_base)
        .with_redirects("https://fitmatch.test/ok", "https://fitmatch.test/cancel");

    let provider = StripeBillingProvider::new(config, subscriptions).expect("provider");
    (provider, repos)
}

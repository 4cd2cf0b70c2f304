//! Service Container - holds all initialized services
//!
//! Services are created once from [`GatewayDependencies`] and shared by every
//! request through `Arc`.

use std::sync::Arc;

use fitmatch_core::{
    create_shared_event_bus, AthleteService, BillingProvider, ChatService, GymService,
    MatchingService, SharedEventBus, SubscriptionService,
};
use tracing::info;

use super::dependencies::{BillingSetup, GatewayDependencies};
use crate::billing::StripeBillingProvider;

#[derive(Clone)]
pub struct ServiceContainer {
    pub matching_service: Arc<MatchingService>,
    pub athlete_service: Arc<AthleteService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub chat_service: Arc<ChatService>,
    pub gym_service: Arc<GymService>,
    pub billing: Arc<dyn BillingProvider>,

    /// Domain events from every service above
    pub event_bus: SharedEventBus,
}

impl ServiceContainer {
    pub fn initialize(deps: &GatewayDependencies) -> anyhow::Result<Self> {
        let event_bus = create_shared_event_bus();

        let matching_service = Arc::new(
            MatchingService::new(deps.matching_repo.clone(), deps.matching_options)
                .with_events(event_bus.sender()),
        );
        info!(
            duplicate_check = ?deps.matching_options.duplicate_check,
            creation = ?deps.matching_options.creation,
            "[Gateway] Matching service configured"
        );

        let athlete_service = Arc::new(
            AthleteService::new(
                deps.athlete_repo.clone(),
                deps.interaction_repo.clone(),
                matching_service.clone(),
            )
            .with_events(event_bus.sender()),
        );

        let subscription_service = Arc::new(
            SubscriptionService::new(
                deps.subscription_repo.clone(),
                deps.package_repo.clone(),
                deps.athlete_repo.clone(),
            )
            .with_events(event_bus.sender()),
        );

        let chat_service = Arc::new(
            ChatService::new(deps.chat_repo.clone(), deps.matching_repo.clone())
                .with_events(event_bus.sender()),
        );

        let gym_service =
            Arc::new(GymService::new(deps.gym_repo.clone()).with_events(event_bus.sender()));

        let billing: Arc<dyn BillingProvider> = match &deps.billing {
            BillingSetup::Stripe(config) => {
                info!(api_base = %config.api_base, "[Gateway] Using Stripe billing");
                Arc::new(StripeBillingProvider::new(
                    config.clone(),
                    subscription_service.clone(),
                )?)
            }
            BillingSetup::Provider(provider) => provider.clone(),
        };

        Ok(Self {
            matching_service,
            athlete_service,
            subscription_service,
            chat_service,
            gym_service,
            billing,
            event_bus,
        })
    }
}

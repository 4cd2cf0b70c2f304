//! Dependency Injection Container
//!
//! Everything the gateway needs from outside: repositories, the billing
//! backend, token signing settings and matching behaviour.

use std::sync::Arc;

use fitmatch_core::{
    AthleteRepository, BillingProvider, ChatMessageRepository, GymRepository,
    InteractionRepository, MatchingOptions, MatchingRepository, PremiumPackageRepository,
    SubscriptionRepository,
};
use fitmatch_storage::{
    Database, SqliteAthleteRepository, SqliteChatMessageRepository, SqliteGymRepository,
    SqliteInteractionRepository, SqliteMatchingRepository, SqlitePremiumPackageRepository,
    SqliteSubscriptionRepository,
};
use tokio::sync::Mutex;
use tracing::warn;

use crate::auth::TokenSecret;
use crate::billing::StripeConfig;

/// Default access token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// How the billing provider is obtained
#[derive(Clone)]
pub enum BillingSetup {
    /// Stripe, wired to the container's subscription service
    Stripe(StripeConfig),
    /// A ready-made provider
    Provider(Arc<dyn BillingProvider>),
}

#[derive(Clone)]
pub struct GatewayDependencies {
    pub athlete_repo: Arc<dyn AthleteRepository>,
    pub matching_repo: Arc<dyn MatchingRepository>,
    pub interaction_repo: Arc<dyn InteractionRepository>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
    pub package_repo: Arc<dyn PremiumPackageRepository>,
    pub chat_repo: Arc<dyn ChatMessageRepository>,
    pub gym_repo: Arc<dyn GymRepository>,

    pub billing: BillingSetup,

    pub token_secret: TokenSecret,
    pub token_ttl_secs: i64,

    pub matching_options: MatchingOptions,
}

/// Builder for GatewayDependencies
///
/// `with_database` fills every repository that was not set explicitly with
/// its SQLite implementation.
#[derive(Default)]
pub struct DependenciesBuilder {
    database: Option<Arc<Mutex<Database>>>,
    athlete_repo: Option<Arc<dyn AthleteRepository>>,
    matching_repo: Option<Arc<dyn MatchingRepository>>,
    interaction_repo: Option<Arc<dyn InteractionRepository>>,
    subscription_repo: Option<Arc<dyn SubscriptionRepository>>,
    package_repo: Option<Arc<dyn PremiumPackageRepository>>,
    chat_repo: Option<Arc<dyn ChatMessageRepository>>,
    gym_repo: Option<Arc<dyn GymRepository>>,
    billing: Option<BillingSetup>,
    token_secret: Option<TokenSecret>,
    token_ttl_secs: Option<i64>,
    matching_options: MatchingOptions,
}

impl DependenciesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(mut self, db: Arc<Mutex<Database>>) -> Self {
        self.database = Some(db);
        self
    }

    pub fn with_athlete_repo(mut self, repo: Arc<dyn AthleteRepository>) -> Self {
        self.athlete_repo = Some(repo);
        self
    }

    pub fn with_matching_repo(mut self, repo: Arc<dyn MatchingRepository>) -> Self {
        self.matching_repo = Some(repo);
        self
    }

    pub fn with_interaction_repo(mut self, repo: Arc<dyn InteractionRepository>) -> Self {
        self.interaction_repo = Some(repo);
        self
    }

    pub fn with_subscription_repo(mut self, repo: Arc<dyn SubscriptionRepository>) -> Self {
        self.subscription_repo = Some(repo);
        self
    }

    pub fn with_package_repo(mut self, repo: Arc<dyn PremiumPackageRepository>) -> Self {
        self.package_repo = Some(repo);
        self
    }

    pub fn with_chat_repo(mut self, repo: Arc<dyn ChatMessageRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn with_gym_repo(mut self, repo: Arc<dyn GymRepository>) -> Self {
        self.gym_repo = Some(repo);
        self
    }

    pub fn with_stripe(mut self, config: StripeConfig) -> Self {
        self.billing = Some(BillingSetup::Stripe(config));
        self
    }

    pub fn with_billing_provider(mut self, provider: Arc<dyn BillingProvider>) -> Self {
        self.billing = Some(BillingSetup::Provider(provider));
        self
    }

    pub fn with_token_secret(mut self, secret: TokenSecret) -> Self {
        self.token_secret = Some(secret);
        self
    }

    pub fn with_token_ttl_secs(mut self, ttl: i64) -> Self {
        self.token_ttl_secs = Some(ttl);
        self
    }

    pub fn with_matching_options(mut self, options: MatchingOptions) -> Self {
        self.matching_options = options;
        self
    }

    pub fn build(self) -> Result<GatewayDependencies, String> {
        let db = self.database;
        // Explicit repo, else SQLite on the shared database, else an error
        macro_rules! repo {
            ($field:expr, $sqlite:ident, $name:literal) => {
                match ($field, db.as_ref()) {
                    (Some(repo), _) => repo,
                    (None, Some(db)) => Arc::new($sqlite::new(db.clone())),
                    (None, None) => return Err(concat!($name, " is required").to_string()),
                }
            };
        }

        let athlete_repo: Arc<dyn AthleteRepository> =
            repo!(self.athlete_repo, SqliteAthleteRepository, "athlete_repo");
        let matching_repo: Arc<dyn MatchingRepository> =
            repo!(self.matching_repo, SqliteMatchingRepository, "matching_repo");
        let interaction_repo: Arc<dyn InteractionRepository> =
            repo!(self.interaction_repo, SqliteInteractionRepository, "interaction_repo");
        let subscription_repo: Arc<dyn SubscriptionRepository> =
            repo!(self.subscription_repo, SqliteSubscriptionRepository, "subscription_repo");
        let package_repo: Arc<dyn PremiumPackageRepository> =
            repo!(self.package_repo, SqlitePremiumPackageRepository, "package_repo");
        let chat_repo: Arc<dyn ChatMessageRepository> =
            repo!(self.chat_repo, SqliteChatMessageRepository, "chat_repo");
        let gym_repo: Arc<dyn GymRepository> = repo!(self.gym_repo, SqliteGymRepository, "gym_repo");

        let billing = self.billing.ok_or("billing provider is required")?;

        let token_secret = self.token_secret.unwrap_or_else(|| {
            warn!("[Gateway] No token secret configured, generating an ephemeral one");
            TokenSecret::generate()
        });

        Ok(GatewayDependencies {
            athlete_repo,
            matching_repo,
            interaction_repo,
            subscription_repo,
            package_repo,
            chat_repo,
            gym_repo,
            billing,
            token_secret,
            token_ttl_secs: self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            matching_options: self.matching_options,
        })
    }
}

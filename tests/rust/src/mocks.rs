//! Mock repository implementations for testing
//!
//! In-memory implementations of all repository traits for fast, isolated tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

use fitmatch_core::{
    domain::{Athlete, ChatMessage, Gym, Interaction, Matching, PremiumPackage, Subscription},
    keys,
    repository::{
        AthleteRepository, ChatMessageRepository, GymRepository, InteractionRepository,
        MatchingRepository, PremiumPackageRepository, RepoResult, SubscriptionRepository,
    },
    BillingProvider, CheckoutSession, DomainError, DomainResult, WebhookOutcome,
};
use fitmatch_gateway::DependenciesBuilder;

// ============================================================================
// MockAthleteRepository
// ============================================================================

#[derive(Default)]
pub struct MockAthleteRepository {
    athletes: RwLock<HashMap<Uuid, Athlete>>,
}

impl MockAthleteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_athlete(self, athlete: Athlete) -> Self {
        self.athletes.write().unwrap().insert(athlete.id, athlete);
        self
    }
}

#[async_trait]
impl AthleteRepository for MockAthleteRepository {
    async fn get(&self, id: &Uuid) -> RepoResult<Option<Athlete>> {
        Ok(self.athletes.read().unwrap().get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> RepoResult<Option<Athlete>> {
        Ok(self
            .athletes
            .read()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn create(&self, athlete: &Athlete) -> RepoResult<()> {
        self.athletes.write().unwrap().insert(athlete.id, athlete.clone());
        Ok(())
    }

    async fn update(&self, athlete: &Athlete) -> RepoResult<()> {
        self.athletes.write().unwrap().insert(athlete.id, athlete.clone());
        Ok(())
    }
}

// ============================================================================
// MockMatchingRepository
// ============================================================================

#[derive(Default)]
pub struct MockMatchingRepository {
    matchings: RwLock<HashMap<Uuid, Matching>>,
    yield_after_lookup: bool,
}

impl MockMatchingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Yield to the scheduler between the active-pair lookup and its result,
    /// so two concurrent `match` calls both observe "no active matching".
    pub fn yielding() -> Self {
        Self {
            yield_after_lookup: true,
            ..Self::default()
        }
    }

    pub fn with_matching(self, matching: Matching) -> Self {
        self.matchings.write().unwrap().insert(matching.id, matching);
        self
    }

    pub fn all(&self) -> Vec<Matching> {
        self.matchings.read().unwrap().values().cloned().collect()
    }

    pub fn active_count(&self) -> usize {
        self.all().iter().filter(|m| m.is_active()).count()
    }
}

#[async_trait]
impl MatchingRepository for MockMatchingRepository {
    async fn get(&self, id: &Uuid) -> RepoResult<Option<Matching>> {
        Ok(self.matchings.read().unwrap().get(id).cloned())
    }

    async fn find_active_between(&self, first: &Uuid, second: &Uuid) -> RepoResult<Option<Matching>> {
        let found = self
            .all()
            .into_iter()
            .find(|m| m.is_active() && m.is_between(first, second));
        if self.yield_after_lookup {
            tokio::task::yield_now().await;
        }
        Ok(found)
    }

    async fn find_by_id_for_participant(
        &self,
        id: &Uuid,
        user_id: &Uuid,
    ) -> RepoResult<Option<Matching>> {
        Ok(self
            .matchings
            .read()
            .unwrap()
            .get(id)
            .filter(|m| m.involves(user_id))
            .cloned())
    }

    async fn create(&self, matching: &Matching) -> RepoResult<()> {
        self.matchings
            .write()
            .unwrap()
            .insert(matching.id, matching.clone());
        Ok(())
    }

    async fn update(&self, matching: &Matching) -> RepoResult<()> {
        let mut matchings = self.matchings.write().unwrap();
        if !matchings.contains_key(&matching.id) {
            anyhow::bail!("matching {} not found", matching.id);
        }
        matchings.insert(matching.id, matching.clone());
        Ok(())
    }
}

// ============================================================================
// MockInteractionRepository
// ============================================================================

#[derive(Default)]
pub struct MockInteractionRepository {
    interactions: RwLock<HashMap<(Uuid, Uuid), Interaction>>,
}

impl MockInteractionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InteractionRepository for MockInteractionRepository {
    async fn find(&self, interacting: &Uuid, interacted: &Uuid) -> RepoResult<Option<Interaction>> {
        Ok(self
            .interactions
            .read()
            .unwrap()
            .get(&(*interacting, *interacted))
            .cloned())
    }

    async fn create(&self, interaction: &Interaction) -> RepoResult<bool> {
        let key = (interaction.interacting_user, interaction.interacted_user);
        let mut interactions = self.interactions.write().unwrap();
        if interactions.contains_key(&key) {
            return Ok(false);
        }
        interactions.insert(key, interaction.clone());
        Ok(true)
    }
}

// ============================================================================
// MockSubscriptionRepository
// ============================================================================

#[derive(Default)]
pub struct MockSubscriptionRepository {
    subscriptions: RwLock<HashMap<Uuid, Subscription>>,
}

impl MockSubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Subscription> {
        self.subscriptions.read().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepository {
    async fn find_active(
        &self,
        user_id: &Uuid,
        package_name: &str,
    ) -> RepoResult<Option<Subscription>> {
        Ok(self
            .all()
            .into_iter()
            .find(|s| s.user_id == *user_id && s.package_name == package_name && s.is_active()))
    }

    async fn find_by_provider_id(
        &self,
        provider_subscription_id: &str,
    ) -> RepoResult<Option<Subscription>> {
        Ok(self
            .all()
            .into_iter()
            .find(|s| s.provider_subscription_id.as_deref() == Some(provider_subscription_id)))
    }

    async fn count_active_for_user(&self, user_id: &Uuid) -> RepoResult<usize> {
        Ok(self
            .all()
            .iter()
            .filter(|s| s.user_id == *user_id && s.is_active())
            .count())
    }

    async fn create(&self, subscription: &Subscription) -> RepoResult<()> {
        self.subscriptions
            .write()
            .unwrap()
            .insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> RepoResult<()> {
        self.subscriptions
            .write()
            .unwrap()
            .insert(subscription.id, subscription.clone());
        Ok(())
    }
}

// ============================================================================
// MockPackageRepository / MockChatRepository / MockGymRepository
// ============================================================================

#[derive(Default)]
pub struct MockPackageRepository {
    packages: RwLock<Vec<PremiumPackage>>,
}

#[async_trait]
impl PremiumPackageRepository for MockPackageRepository {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<PremiumPackage>> {
        Ok(self
            .packages
            .read()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn list(&self) -> RepoResult<Vec<PremiumPackage>> {
        Ok(self.packages.read().unwrap().clone())
    }

    async fn create(&self, package: &PremiumPackage) -> RepoResult<()> {
        self.packages.write().unwrap().push(package.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockChatRepository {
    messages: RwLock<Vec<ChatMessage>>,
}

#[async_trait]
impl ChatMessageRepository for MockChatRepository {
    async fn create(&self, message: &ChatMessage) -> RepoResult<()> {
        self.messages.write().unwrap().push(message.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockGymRepository {
    gyms: RwLock<Vec<Gym>>,
}

#[async_trait]
impl GymRepository for MockGymRepository {
    async fn find_by_name_and_city(&self, name: &str, city: &str) -> RepoResult<Option<Gym>> {
        Ok(self
            .gyms
            .read()
            .unwrap()
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name) && g.city.eq_ignore_ascii_case(city))
            .cloned())
    }

    async fn create(&self, gym: &Gym) -> RepoResult<()> {
        self.gyms.write().unwrap().push(gym.clone());
        Ok(())
    }
}

// ============================================================================
// MockRepositories
// ============================================================================

/// One of each repository, kept reachable so tests can inspect state
#[derive(Default, Clone)]
pub struct MockRepositories {
    pub athletes: Arc<MockAthleteRepository>,
    pub matchings: Arc<MockMatchingRepository>,
    pub interactions: Arc<MockInteractionRepository>,
    pub subscriptions: Arc<MockSubscriptionRepository>,
    pub packages: Arc<MockPackageRepository>,
    pub chats: Arc<MockChatRepository>,
    pub gyms: Arc<MockGymRepository>,
}

impl MockRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matchings(mut self, matchings: MockMatchingRepository) -> Self {
        self.matchings = Arc::new(matchings);
        self
    }

    /// A builder with every repository slot filled
    pub fn builder(&self) -> DependenciesBuilder {
        DependenciesBuilder::new()
            .with_athlete_repo(self.athletes.clone())
            .with_matching_repo(self.matchings.clone())
            .with_interaction_repo(self.interactions.clone())
            .with_subscription_repo(self.subscriptions.clone())
            .with_package_repo(self.packages.clone())
            .with_chat_repo(self.chats.clone())
            .with_gym_repo(self.gyms.clone())
    }
}

// ============================================================================
// FakeBillingProvider
// ============================================================================

/// A checkout request as the provider received it
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub user_id: Uuid,
    pub email: String,
    pub lookup_key: String,
}

/// Billing provider that answers from memory
#[derive(Default)]
pub struct FakeBillingProvider {
    sessions: Mutex<Vec<SessionRequest>>,
    known_keys: RwLock<Option<Vec<String>>>,
    unavailable: bool,
}

impl FakeBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only these lookup keys resolve to a price
    pub fn with_known_keys(self, keys: &[&str]) -> Self {
        *self.known_keys.write().unwrap() = Some(keys.iter().map(|k| k.to_string()).collect());
        self
    }

    /// Every call fails as if the provider were down
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn sessions(&self) -> Vec<SessionRequest> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl BillingProvider for FakeBillingProvider {
    async fn create_session(
        &self,
        user_id: Uuid,
        email: &str,
        lookup_key: &str,
    ) -> DomainResult<CheckoutSession> {
        if self.unavailable {
            return Err(DomainError::billing(
                keys::BILLING_UNAVAILABLE,
                "provider unreachable",
            ));
        }
        if let Some(known) = self.known_keys.read().unwrap().as_ref() {
            if !known.iter().any(|k| k == lookup_key) {
                return Err(DomainError::DocumentNotFound(keys::PACKAGE_NOT_FOUND));
            }
        }

        let mut sessions = self.sessions.lock().unwrap();
        sessions.push(SessionRequest {
            user_id,
            email: email.to_string(),
            lookup_key: lookup_key.to_string(),
        });
        let id = format!("cs_test_{}", sessions.len());
        Ok(CheckoutSession {
            url: Some(format!("https://checkout.test/{}", id)),
            id,
        })
    }

    async fn handle_webhook(
        &self,
        _payload: &[u8],
        signature: Option<&str>,
    ) -> DomainResult<WebhookOutcome> {
        match signature {
            Some(_) => Ok(WebhookOutcome::Ignored {
                event_type: "test.event".to_string(),
            }),
            None => Err(DomainError::billing(
                keys::INVALID_SIGNATURE,
                "missing signature",
            )),
        }
    }
}

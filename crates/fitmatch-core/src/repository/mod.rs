//! Repository traits for data access
//!
//! These traits define the interface for data storage without specifying
//! the implementation (SQLite, in-memory, etc.). Queries are named by
//! intent; no filter DSL crosses this boundary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Athlete, ChatMessage, Gym, Interaction, Matching, PremiumPackage, Subscription,
};

/// Result type for repository operations
pub type RepoResult<T> = anyhow::Result<T>;

/// Athlete repository trait
#[async_trait]
pub trait AthleteRepository: Send + Sync {
    /// Get an athlete by ID
    async fn get(&self, id: &Uuid) -> RepoResult<Option<Athlete>>;

    /// Get an athlete by (lowercase) email
    async fn get_by_email(&self, email: &str) -> RepoResult<Option<Athlete>>;

    /// Create a new athlete
    async fn create(&self, athlete: &Athlete) -> RepoResult<()>;

    /// Update an athlete
    async fn update(&self, athlete: &Athlete) -> RepoResult<()>;
}

/// Matching repository trait
#[async_trait]
pub trait MatchingRepository: Send + Sync {
    /// Get a matching by ID
    async fn get(&self, id: &Uuid) -> RepoResult<Option<Matching>>;

    /// Find the ACTIVE matching between two users, in either orientation
    async fn find_active_between(&self, first: &Uuid, second: &Uuid)
        -> RepoResult<Option<Matching>>;

    /// Find a matching by ID, only if `user_id` is one of its participants.
    ///
    /// Closed matchings are returned as well.
    async fn find_by_id_for_participant(
        &self,
        id: &Uuid,
        user_id: &Uuid,
    ) -> RepoResult<Option<Matching>>;

    /// Persist a new matching
    async fn create(&self, matching: &Matching) -> RepoResult<()>;

    /// Persist changes to an existing matching
    async fn update(&self, matching: &Matching) -> RepoResult<()>;
}

/// Interaction (like/dislike) repository trait
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// Find the interaction from `interacting` toward `interacted`
    async fn find(&self, interacting: &Uuid, interacted: &Uuid)
        -> RepoResult<Option<Interaction>>;

    /// Record a new interaction, `false` if the ordered pair already has one
    async fn create(&self, interaction: &Interaction) -> RepoResult<bool>;
}

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find the ACTIVE subscription of a user to a package
    async fn find_active(
        &self,
        user_id: &Uuid,
        package_name: &str,
    ) -> RepoResult<Option<Subscription>>;

    /// Find a subscription by its billing provider id
    async fn find_by_provider_id(
        &self,
        provider_subscription_id: &str,
    ) -> RepoResult<Option<Subscription>>;

    /// Count ACTIVE subscriptions of a user
    async fn count_active_for_user(&self, user_id: &Uuid) -> RepoResult<usize>;

    async fn create(&self, subscription: &Subscription) -> RepoResult<()>;

    async fn update(&self, subscription: &Subscription) -> RepoResult<()>;
}

/// Premium package repository trait
#[async_trait]
pub trait PremiumPackageRepository: Send + Sync {
    async fn get_by_name(&self, name: &str) -> RepoResult<Option<PremiumPackage>>;

    async fn list(&self) -> RepoResult<Vec<PremiumPackage>>;

    async fn create(&self, package: &PremiumPackage) -> RepoResult<()>;
}

/// Chat message repository trait
#[async_trait]
pub trait ChatMessageRepository: Send + Sync {
    async fn create(&self, message: &ChatMessage) -> RepoResult<()>;
}

/// Gym repository trait
#[async_trait]
pub trait GymRepository: Send + Sync {
    /// Find a gym by name and city (case-insensitive)
    async fn find_by_name_and_city(&self, name: &str, city: &str) -> RepoResult<Option<Gym>>;

    async fn create(&self, gym: &Gym) -> RepoResult<()>;
}

//! SQLite implementations of SubscriptionRepository and PremiumPackageRepository.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use fitmatch_core::{
    PremiumPackage, PremiumPackageRepository, Subscription, SubscriptionRepository,
    SubscriptionStatus,
};
use rusqlite::{params, OptionalExtension, Row};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{invalid_value, parse_datetime, parse_uuid};
use crate::Database;

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, package_name, status, provider_subscription_id, \
     provider_customer_id, created_at, updated_at, cancelled_at";

/// SQLite-backed implementation of SubscriptionRepository.
pub struct SqliteSubscriptionRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteSubscriptionRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn row_to_subscription(row: &Row<'_>) -> rusqlite::Result<Subscription> {
        let status: String = row.get(3)?;
        Ok(Subscription {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            user_id: parse_uuid(1, &row.get::<_, String>(1)?)?,
            package_name: row.get(2)?,
            status: SubscriptionStatus::parse(&status).ok_or_else(|| invalid_value(3, &status))?,
            provider_subscription_id: row.get(4)?,
            provider_customer_id: row.get(5)?,
            created_at: parse_datetime(&row.get::<_, String>(6)?),
            updated_at: parse_datetime(&row.get::<_, String>(7)?),
            cancelled_at: row
                .get::<_, Option<String>>(8)?
                .map(|s| parse_datetime(&s)),
        })
    }
}

#[async_trait]
impl SubscriptionRepository for SqliteSubscriptionRepository {
    async fn find_active(&self, user_id: &Uuid, package_name: &str) -> Result<Option<Subscription>> {
        let db = self.db.lock().await;
        let subscription = db
            .connection()
            .query_row(
                &format!(
                    "SELECT {} FROM subscriptions
                     WHERE user_id = ?1 AND package_name = ?2 AND status = 'ACTIVE'
                     ORDER BY created_at DESC LIMIT 1",
                    SUBSCRIPTION_COLUMNS
                ),
                params![user_id.to_string(), package_name],
                Self::row_to_subscription,
            )
            .optional()?;
        Ok(subscription)
    }

    async fn find_by_provider_id(&self, provider_subscription_id: &str) -> Result<Option<Subscription>> {
        let db = self.db.lock().await;
        let subscription = db
            .connection()
            .query_row(
                &format!(
                    "SELECT {} FROM subscriptions WHERE provider_subscription_id = ?",
                    SUBSCRIPTION_COLUMNS
                ),
                params![provider_subscription_id],
                Self::row_to_subscription,
            )
            .optional()?;
        Ok(subscription)
    }

    async fn count_active_for_user(&self, user_id: &Uuid) -> Result<usize> {
        let db = self.db.lock().await;
        let count: i64 = db.connection().query_row(
            "SELECT COUNT(*) FROM subscriptions WHERE user_id = ? AND status = 'ACTIVE'",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    async fn create(&self, subscription: &Subscription) -> Result<()> {
        let db = self.db.lock().await;
        db.connection().execute(
            &format!(
                "INSERT INTO subscriptions ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                SUBSCRIPTION_COLUMNS
            ),
            params![
                subscription.id.to_string(),
                subscription.user_id.to_string(),
                subscription.package_name,
                subscription.status.as_str(),
                subscription.provider_subscription_id,
                subscription.provider_customer_id,
                subscription.created_at.to_rfc3339(),
                subscription.updated_at.to_rfc3339(),
                subscription.cancelled_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<()> {
        let db = self.db.lock().await;
        let updated = db.connection().execute(
            "UPDATE subscriptions SET status = ?2, provider_subscription_id = ?3,
                provider_customer_id = ?4, updated_at = ?5, cancelled_at = ?6
             WHERE id = ?1",
            params![
                subscription.id.to_string(),
                subscription.status.as_str(),
                subscription.provider_subscription_id,
                subscription.provider_customer_id,
                subscription.updated_at.to_rfc3339(),
                subscription.cancelled_at.map(|t| t.to_rfc3339()),
            ],
        )?;

        if updated == 0 {
            anyhow::bail!("Subscription not found: {}", subscription.id);
        }
        Ok(())
    }
}

/// SQLite-backed implementation of PremiumPackageRepository.
pub struct SqlitePremiumPackageRepository {
    db: Arc<Mutex<Database>>,
}

impl SqlitePremiumPackageRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    fn row_to_package(row: &Row<'_>) -> rusqlite::Result<PremiumPackage> {
        Ok(PremiumPackage {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            name: row.get(1)?,
            lookup_key: row.get(2)?,
            description: row.get(3)?,
            price_cents: row.get(4)?,
            currency: row.get(5)?,
            created_at: parse_datetime(&row.get::<_, String>(6)?),
        })
    }
}

#[async_trait]
impl PremiumPackageRepository for SqlitePremiumPackageRepository {
    async fn get_by_name(&self, name: &str) -> Result<Option<PremiumPackage>> {
        let db = self.db.lock().await;
        let package = db
            .connection()
            .query_row(
                "SELECT id, name, lookup_key, description, price_cents, currency, created_at
                 FROM premium_packages WHERE name = ?",
                params![name],
                Self::row_to_package,
            )
            .optional()?;
        Ok(package)
    }

    async fn list(&self) -> Result<Vec<PremiumPackage>> {
        let db = self.db.lock().await;
        let conn = db.connection();
        let mut stmt = conn.prepare(
            "SELECT id, name, lookup_key, description, price_cents, currency, created_at
             FROM premium_packages ORDER BY price_cents ASC, name ASC",
        )?;
        let packages = stmt
            .query_map([], Self::row_to_package)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(packages)
    }

    async fn create(&self, package: &PremiumPackage) -> Result<()> {
        let db = self.db.lock().await;
        db.connection().execute(
            "INSERT INTO premium_packages (id, name, lookup_key, description, price_cents, currency, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                package.id.to_string(),
                package.name,
                package.lookup_key,
                package.description,
                package.price_cents,
                package.currency,
                package.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}

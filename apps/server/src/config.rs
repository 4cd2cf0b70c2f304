//! Server configuration from environment variables
//!
//! `.env` is loaded first (see `main`), so every value below can live there.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use fitmatch_core::{branding, DuplicateCheckMode, MatchCreationMode, MatchingOptions};
use fitmatch_gateway::StripeConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    /// Passphrase the token signing key is derived from
    pub token_secret: Option<String>,
    pub token_ttl_secs: i64,
    pub matching: MatchingOptions,
    pub stripe: StripeConfig,
}

fn app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(branding::APP_ID)
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("FITMATCH_PORT") {
            Some(v) => v.parse().with_context(|| format!("FITMATCH_PORT is not a port: {}", v))?,
            None => branding::DEFAULT_PORT,
        };
        let token_ttl_secs = match get("FITMATCH_TOKEN_TTL_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("FITMATCH_TOKEN_TTL_SECS is not a number: {}", v))?,
            None => fitmatch_gateway::server::DEFAULT_TOKEN_TTL_SECS,
        };
        if token_ttl_secs <= 0 {
            bail!("FITMATCH_TOKEN_TTL_SECS must be positive");
        }

        let mut matching = MatchingOptions::default();
        if let Some(v) = get("FITMATCH_DUPLICATE_CHECK") {
            matching.duplicate_check = DuplicateCheckMode::parse(&v)
                .with_context(|| format!("Unknown FITMATCH_DUPLICATE_CHECK: {}", v))?;
        }
        if let Some(v) = get("FITMATCH_MATCH_CREATION") {
            matching.creation = MatchCreationMode::parse(&v)
                .with_context(|| format!("Unknown FITMATCH_MATCH_CREATION: {}", v))?;
        }

        let database_path = get("FITMATCH_DATABASE_PATH")
            .map(PathBuf::from)
            .or_else(fitmatch_storage::default_database_path)
            .unwrap_or_else(|| PathBuf::from(fitmatch_storage::DATABASE_FILE));
        let log_dir = get("FITMATCH_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| app_data_dir().join("logs"));

        let secret_key = get("STRIPE_SECRET_KEY").context("STRIPE_SECRET_KEY is required")?;
        let webhook_secret =
            get("STRIPE_WEBHOOK_SECRET").context("STRIPE_WEBHOOK_SECRET is required")?;
        let mut stripe = StripeConfig::new(secret_key, webhook_secret);
        if let Some(api_base) = get("STRIPE_API_BASE") {
            stripe = stripe.with_api_base(api_base);
        }
        if let (Some(success), Some(cancel)) = (get("STRIPE_SUCCESS_URL"), get("STRIPE_CANCEL_URL")) {
            stripe = stripe.with_redirects(success, cancel);
        }

        Ok(Self {
            host: get("FITMATCH_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            database_path,
            log_dir,
            token_secret: get("FITMATCH_TOKEN_SECRET"),
            token_ttl_secs,
            matching,
            stripe,
        })
    }
}

//! FitMatch API server
//!
//! Loads configuration, opens the database, wires the gateway and serves.

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use fitmatch_core::branding;
use fitmatch_gateway::{DependenciesBuilder, GatewayConfig, GatewayServer, TokenSecret};
use fitmatch_storage::Database;
use tokio::sync::Mutex;
use tracing::{info, warn};

use config::ServerConfig;

/// Console and daily rolling file logging
///
/// The returned guard flushes the file writer and must outlive the server.
fn init_tracing(config: &ServerConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    std::fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("Failed to create logs directory {:?}", config.log_dir))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(branding::LOG_PREFIX)
        .filename_suffix("log")
        .build(&config.log_dir)
        .context("Failed to create log file appender")?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG takes precedence
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,fitmatch_core=debug,fitmatch_gateway=debug,fitmatch_storage=debug,tower_http=info")
    });

    let console_layer = fmt::layer()
        .with_ansi(true)
        .compact()
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env()?;
    let _guard = init_tracing(&config)?;

    info!(
        "[Server] {} v{} starting, logs in {:?}",
        branding::DISPLAY_NAME,
        env!("CARGO_PKG_VERSION"),
        config.log_dir
    );

    let database = Database::open(&config.database_path)?;
    info!("[Server] Database ready at {:?}", config.database_path);
    let database = Arc::new(Mutex::new(database));

    let token_secret = match config.token_secret.as_deref() {
        Some(passphrase) => TokenSecret::from_passphrase(passphrase),
        None => {
            warn!("[Server] FITMATCH_TOKEN_SECRET not set, tokens will not survive a restart");
            TokenSecret::generate()
        }
    };

    let dependencies = DependenciesBuilder::new()
        .with_database(database)
        .with_stripe(config.stripe.clone())
        .with_token_secret(token_secret)
        .with_token_ttl_secs(config.token_ttl_secs)
        .with_matching_options(config.matching)
        .build()
        .map_err(anyhow::Error::msg)?;

    let gateway_config = GatewayConfig {
        host: config.host.clone(),
        port: config.port,
        ..GatewayConfig::default()
    };

    GatewayServer::new(gateway_config, dependencies)?.run().await
}

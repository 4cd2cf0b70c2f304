//! Gateway Server
//!
//! HTTP API for FitMatch. Self-contained with dependency injection: the
//! server owns its services and is given repositories and a billing backend.

mod dependencies;
mod handlers;
pub mod logging_middleware;
pub mod rate_limit;
mod service_container;

pub use dependencies::{BillingSetup, DependenciesBuilder, GatewayDependencies, DEFAULT_TOKEN_TTL_SECS};
pub use handlers::{
    AppState, ApiJson, ApiPath, HealthResponse, InteractionRequest, LoginRequest, LoginResponse,
    SendMessageRequest, SubscribeRequest, SIGNATURE_HEADER,
};
pub use service_container::ServiceContainer;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::auth_middleware;
use crate::consumers::AuditLogger;

/// Gateway server configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Enable CORS for browser access
    pub enable_cors: bool,
    /// Largest accepted request body in bytes
    pub body_limit: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: fitmatch_core::branding::DEFAULT_PORT,
            enable_cors: true,
            body_limit: 5 * 1024 * 1024,
        }
    }
}

impl GatewayConfig {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", addr, e))
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

pub struct GatewayServer {
    config: GatewayConfig,
    services: Arc<ServiceContainer>,
    dependencies: GatewayDependencies,
}

impl GatewayServer {
    pub fn new(config: GatewayConfig, dependencies: GatewayDependencies) -> anyhow::Result<Self> {
        info!("[Gateway] Initializing with dependency injection...");

        let services = Arc::new(ServiceContainer::initialize(&dependencies)?);

        info!("[Gateway] Services initialized successfully");

        Ok(Self {
            config,
            services,
            dependencies,
        })
    }

    pub fn services(&self) -> Arc<ServiceContainer> {
        self.services.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        let app_state = AppState {
            services: self.services.clone(),
            token_secret: self.dependencies.token_secret.clone(),
            token_ttl_secs: self.dependencies.token_ttl_secs,
        };

        let protected = Router::new()
            .route("/athletes/likes", post(handlers::like_athlete))
            .route("/athletes/dislikes", post(handlers::dislike_athlete))
            .route(
                "/athletes/matching/{matching_id}/unlink",
                put(handlers::unlink_matching),
            )
            .route("/subscriptions/subscribe", post(handlers::subscribe))
            .route("/subscriptions/unsubscribe", post(handlers::unsubscribe))
            .route(
                "/subscriptions/packages/premiums",
                post(handlers::create_premium_package),
            )
            .route("/chats/{chat_id}/messages", post(handlers::send_message))
            .route("/gyms", post(handlers::create_gym))
            .route_layer(middleware::from_fn_with_state(
                app_state.clone(),
                auth_middleware,
            ));

        let rate_limiter = rate_limit::default_rate_limiter();

        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .route("/login", post(handlers::login))
            .route("/athletes", post(handlers::register_athlete))
            // Authenticated by signature, not by token
            .route("/subscriptions/webhook", post(handlers::webhook))
            .merge(protected)
            .with_state(app_state)
            .layer(DefaultBodyLimit::max(self.config.body_limit))
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn(
                logging_middleware::http_logging_middleware,
            ))
            // Extension must wrap the limiter so the request carries it on arrival
            .layer(middleware::from_fn(rate_limit::rate_limit_middleware))
            .layer(axum::Extension(rate_limiter));

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    /// Start the audit consumer, bind, and serve until the listener fails
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.addr()?;

        info!("[Gateway] Starting on {}", addr);
        info!(
            "[Gateway] CORS: {}",
            if self.config.enable_cors {
                "enabled"
            } else {
                "disabled"
            }
        );

        let audit = Arc::new(AuditLogger::new());
        audit.start(self.services.event_bus.subscribe());

        let router = self.build_router();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("[Gateway] Ready to accept connections at {}", self.config.base_url());

        axum::serve(listener, router).await?;

        Ok(())
    }
}

//! FitMatch Gateway
//!
//! HTTP surface of FitMatch:
//! - Athlete login with HMAC-signed access tokens
//! - Route registration for athletes, matchings, subscriptions, chats and gyms
//! - Stripe checkout sessions and signed webhooks
//! - Translation of domain errors into `{ error, error_description, details }`
//! - Audit logging of domain events

pub mod auth;
pub mod billing;
pub mod consumers;
pub mod error;
pub mod logging;
pub mod server;

pub use auth::{create_access_token, validate_token, TokenClaims, TokenSecret};
pub use billing::{StripeBillingProvider, StripeConfig};
pub use consumers::AuditLogger;
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use server::{
    AppState, BillingSetup, DependenciesBuilder, GatewayConfig, GatewayDependencies,
    GatewayServer, ServiceContainer,
};

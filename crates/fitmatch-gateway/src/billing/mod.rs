//! Billing provider implementations

mod signature;
mod stripe;

pub use signature::{sign_payload, verify_signature, DEFAULT_TOLERANCE_SECS};
pub use stripe::{StripeBillingProvider, StripeConfig, DEFAULT_API_BASE};

//! Domain error taxonomy
//!
//! Services return [`DomainError`]; the gateway translates each kind into an
//! HTTP status and a `{ error, error_description, details }` body.

use thiserror::Error;

use crate::service::MappingError;

/// Error keys surfaced to clients in the `error` field.
pub mod keys {
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const MATCHING_EXISTS: &str = "matching.exists";
    pub const MATCHING_NOT_FOUND: &str = "matching.notFound";
    pub const USER_EXISTS: &str = "user.exists";
    pub const USER_NOT_FOUND: &str = "user.notFound";
    pub const INTERACTION_EXISTS: &str = "interaction.exists";
    pub const INTERACTION_SELF: &str = "interaction.self";
    pub const LIKE_LIMIT_EXCEEDED: &str = "like.limitExceeded";
    pub const SUBSCRIPTION_NOT_FOUND: &str = "subscription.notFound";
    pub const PACKAGE_EXISTS: &str = "package.exists";
    pub const PACKAGE_NOT_FOUND: &str = "package.notFound";
    pub const CHAT_NOT_FOUND: &str = "chat.notFound";
    pub const GYM_EXISTS: &str = "gym.exists";
    pub const INVALID_CREDENTIALS: &str = "invalid_credentials";
    pub const INVALID_SIGNATURE: &str = "billing.invalidSignature";
    pub const BILLING_UNAVAILABLE: &str = "billing.unavailable";
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// A uniqueness invariant would be violated
    #[error("document already exists: {0}")]
    DocumentExists(&'static str),

    /// The referenced entity does not exist (or is not visible to the caller)
    #[error("document not found: {0}")]
    DocumentNotFound(&'static str),

    /// The request is well-formed JSON but breaks a field rule
    #[error("validation failed: {key}")]
    Validation {
        key: &'static str,
        details: Vec<String>,
    },

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The billing provider rejected or failed a call
    #[error("billing error: {message}")]
    Billing { key: &'static str, message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    pub fn validation(key: &'static str, details: Vec<String>) -> Self {
        Self::Validation { key, details }
    }

    pub fn billing(key: &'static str, message: impl Into<String>) -> Self {
        Self::Billing {
            key,
            message: message.into(),
        }
    }

    /// The client-facing key for domain errors, `None` for internal ones
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Self::DocumentExists(key)
            | Self::DocumentNotFound(key)
            | Self::Unauthorized(key)
            | Self::Validation { key, .. }
            | Self::Billing { key, .. } => Some(key),
            Self::Mapping(_) | Self::Internal(_) => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

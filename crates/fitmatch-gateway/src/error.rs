//! Error translation
//!
//! Every failure leaves the API as `{ error, error_description, details }`.
//! Domain keys (`matching.exists`, `matching.notFound`, ...) go in `error`;
//! anything unexpected becomes `internal_error` with the cause kept in the log.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fitmatch_core::{keys, DomainError};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Generic error types placed in the `error` field
pub mod error_types {
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const RATE_LIMITED: &str = "rate_limited";
}

/// Body returned to clients on failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_description: String,
    #[serde(default)]
    pub details: Vec<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_description: description.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Error returned by handlers
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// Malformed request outside the domain's reach (bad JSON, bad path)
    BadRequest { description: String, details: Vec<String> },
    /// Missing or invalid credentials on a protected route
    Unauthorized(String),
    TooManyRequests,
}

impl ApiError {
    pub fn bad_request(description: impl Into<String>) -> Self {
        Self::BadRequest {
            description: description.into(),
            details: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(e) => domain_status(e),
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match self {
            Self::Domain(e) => domain_body(e),
            Self::BadRequest {
                description,
                details,
            } => ErrorResponse::new(error_types::INVALID_REQUEST, description.clone())
                .with_details(details.clone()),
            Self::Unauthorized(description) => {
                ErrorResponse::new(error_types::INVALID_TOKEN, description.clone())
            }
            Self::TooManyRequests => ErrorResponse::new(
                error_types::RATE_LIMITED,
                "Rate limit exceeded. Please try again later.",
            ),
        }
    }
}

fn domain_status(e: &DomainError) -> StatusCode {
    match e {
        DomainError::DocumentExists(_) => StatusCode::CONFLICT,
        DomainError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Billing { key, .. } if *key == keys::INVALID_SIGNATURE => {
            StatusCode::BAD_REQUEST
        }
        DomainError::Billing { .. } => StatusCode::BAD_GATEWAY,
        DomainError::Mapping(_) | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn domain_body(e: &DomainError) -> ErrorResponse {
    match e {
        DomainError::DocumentExists(key) => ErrorResponse::new(*key, "Document already exists"),
        DomainError::DocumentNotFound(key) => ErrorResponse::new(*key, "Document not found"),
        DomainError::Validation { key, details } => {
            ErrorResponse::new(*key, "Request validation failed").with_details(details.clone())
        }
        DomainError::Unauthorized(key) => ErrorResponse::new(*key, "Invalid email or password"),
        DomainError::Billing { key, message } if *key == keys::INVALID_SIGNATURE => {
            ErrorResponse::new(error_types::INVALID_REQUEST, "Webhook signature rejected")
                .with_details(vec![message.clone()])
        }
        DomainError::Billing { key, .. } => {
            ErrorResponse::new(*key, "Billing provider request failed")
        }
        DomainError::Mapping(_) | DomainError::Internal(_) => {
            ErrorResponse::new(error_types::INTERNAL_ERROR, "Internal server error")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Domain(e) if status.is_server_error() => {
                error!(error = %e, "[Gateway] Request failed");
            }
            ApiError::Domain(e) => {
                warn!(error = %e, status = status.as_u16(), "[Gateway] Request rejected");
            }
            _ => {}
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Domain(DomainError::Internal(e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            description: "Malformed JSON body".to_string(),
            details: vec![rejection.body_text()],
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest {
            description: "Malformed path parameter".to_string(),
            details: vec![rejection.body_text()],
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

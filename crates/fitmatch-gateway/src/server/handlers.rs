//! HTTP handlers for the gateway server
//!
//! Handlers only translate between HTTP and the domain services; every
//! failure is returned as [`ApiError`] and rendered by the error layer.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use fitmatch_core::{
    keys, AthleteResponse, CheckoutSession, CreateGym, CreatePremiumPackage, DomainError,
    InteractionResponse, MatchingResponse, RegisterAthlete,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::ServiceContainer;
use crate::auth::{create_access_token, TokenClaims, TokenSecret};
use crate::error::{ApiError, ApiResult};

/// Header carrying the webhook signature
pub const SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ServiceContainer>,
    pub token_secret: TokenSecret,
    pub token_ttl_secs: i64,
}

/// JSON body whose rejections render as `invalid_request`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections render as `invalid_request`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    debug!("[Gateway] Health check");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: AthleteResponse,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let athlete = state
        .services
        .athlete_service
        .authenticate(&request.email, &request.password)
        .await?;

    let access_token = create_access_token(
        athlete.id,
        &athlete.email,
        state.token_ttl_secs,
        state.token_secret.as_bytes(),
    );
    info!(athlete_id = %athlete.id, "[Gateway] Athlete logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.token_ttl_secs,
        user: AthleteResponse::from(&athlete),
    }))
}

pub async fn register_athlete(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterAthlete>,
) -> ApiResult<(StatusCode, Json<AthleteResponse>)> {
    let athlete = state.services.athlete_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(athlete)))
}

// ============================================================================
// Interactions and matchings
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRequest {
    pub athlete_id: Uuid,
}

pub async fn like_athlete(
    State(state): State<AppState>,
    claims: TokenClaims,
    ApiJson(request): ApiJson<InteractionRequest>,
) -> ApiResult<Json<InteractionResponse>> {
    let response = state
        .services
        .athlete_service
        .like(claims.user_id, request.athlete_id)
        .await?;
    Ok(Json(response))
}

pub async fn dislike_athlete(
    State(state): State<AppState>,
    claims: TokenClaims,
    ApiJson(request): ApiJson<InteractionRequest>,
) -> ApiResult<Json<InteractionResponse>> {
    let response = state
        .services
        .athlete_service
        .dislike(claims.user_id, request.athlete_id)
        .await?;
    Ok(Json(response))
}

/// `PUT /athletes/matching/{matchingId}/unlink`
///
/// An id that is not a UUID cannot name any matching, so it is reported the
/// same way as one the caller does not participate in.
pub async fn unlink_matching(
    State(state): State<AppState>,
    claims: TokenClaims,
    ApiPath(matching_id): ApiPath<String>,
) -> ApiResult<Json<MatchingResponse>> {
    let matching_id = Uuid::parse_str(&matching_id)
        .map_err(|_| DomainError::DocumentNotFound(keys::MATCHING_NOT_FOUND))?;

    let matching = state
        .services
        .matching_service
        .unlink(claims.user_id, matching_id)
        .await?;
    Ok(Json(matching))
}

// ============================================================================
// Subscriptions
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub package_name: String,
}

impl SubscribeRequest {
    fn package_name(&self) -> Result<&str, ApiError> {
        let name = self.package_name.trim();
        if name.is_empty() {
            return Err(DomainError::validation(
                keys::INVALID_REQUEST,
                vec!["packageName must not be empty".to_string()],
            )
            .into());
        }
        Ok(name)
    }
}

/// The package name doubles as the provider's price lookup key
pub async fn subscribe(
    State(state): State<AppState>,
    claims: TokenClaims,
    ApiJson(request): ApiJson<SubscribeRequest>,
) -> ApiResult<Json<CheckoutSession>> {
    let session = state
        .services
        .billing
        .create_session(claims.user_id, &claims.email, request.package_name()?)
        .await?;
    Ok(Json(session))
}

/// Raw body is required: the signature covers the exact bytes received
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = state
        .services
        .billing
        .handle_webhook(&body, signature)
        .await?;
    debug!(event_type = %outcome.event_type(), "[Gateway] Webhook acknowledged");

    Ok(StatusCode::OK.into_response())
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    claims: TokenClaims,
    ApiJson(request): ApiJson<SubscribeRequest>,
) -> ApiResult<Response> {
    let subscription = state
        .services
        .subscription_service
        .unsubscribe(claims.user_id, request.package_name()?)
        .await?;
    Ok(Json(subscription).into_response())
}

pub async fn create_premium_package(
    State(state): State<AppState>,
    _claims: TokenClaims,
    ApiJson(request): ApiJson<CreatePremiumPackage>,
) -> ApiResult<Response> {
    let package = state
        .services
        .subscription_service
        .create_premium_package(request)
        .await?;
    Ok((StatusCode::CREATED, Json(package)).into_response())
}

// ============================================================================
// Chats and gyms
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

pub async fn send_message(
    State(state): State<AppState>,
    claims: TokenClaims,
    ApiPath(chat_id): ApiPath<String>,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> ApiResult<Response> {
    let chat_id = Uuid::parse_str(&chat_id)
        .map_err(|_| DomainError::DocumentNotFound(keys::CHAT_NOT_FOUND))?;

    let message = state
        .services
        .chat_service
        .send_message(claims.user_id, chat_id, &request.message)
        .await?;
    Ok((StatusCode::CREATED, Json(message)).into_response())
}

pub async fn create_gym(
    State(state): State<AppState>,
    claims: TokenClaims,
    ApiJson(request): ApiJson<CreateGym>,
) -> ApiResult<Response> {
    let gym = state
        .services
        .gym_service
        .create(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(gym)).into_response())
}

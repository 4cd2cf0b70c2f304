//! Athlete authentication for the gateway
//!
//! Access tokens are `base64url(payload).base64url(hmac_sha256(payload))`
//! with a JSON payload of `{ user_id, email, exp, iat }`. Protected routes run
//! behind [`auth_middleware`], which injects [`TokenClaims`] for handlers.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::error::{error_types, ErrorResponse};
use crate::server::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Size of the signing key in bytes
pub const TOKEN_SECRET_SIZE: usize = 32;

/// Signing key for access tokens, wiped from memory on drop
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<[u8; TOKEN_SECRET_SIZE]>);

impl TokenSecret {
    /// Fresh random key. Tokens signed with it do not survive a restart.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = Zeroizing::new([0u8; TOKEN_SECRET_SIZE]);
        rand::thread_rng().fill_bytes(bytes.as_mut());
        Self(bytes)
    }

    /// Derive a key from a configured passphrase
    pub fn from_passphrase(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let mut bytes = Zeroizing::new([0u8; TOKEN_SECRET_SIZE]);
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenSecret(..)")
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Handlers take `claims: TokenClaims` to get the authenticated athlete
impl<S> FromRequestParts<S> for TokenClaims
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .ok_or_else(|| unauthorized_response("Missing authentication context"))
    }
}

/// Validate a token and extract claims
pub fn validate_token(token: &str, secret: &[u8]) -> Option<TokenClaims> {
    let Some((payload_b64, signature_b64)) = token.split_once('.') else {
        debug!("[Auth] Invalid token format - missing signature");
        return None;
    };

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload_b64.as_bytes());

    let signature = base64_url_decode(signature_b64)?;
    if mac.verify_slice(&signature).is_err() {
        debug!("[Auth] Invalid token signature");
        return None;
    }

    let payload = base64_url_decode(payload_b64)?;
    let claims: TokenClaims = serde_json::from_slice(&payload).ok()?;

    let now = chrono::Utc::now().timestamp();
    if now > claims.exp {
        debug!("[Auth] Token expired at {}, now is {}", claims.exp, now);
        return None;
    }

    Some(claims)
}

/// Create a signed access token for an athlete
pub fn create_access_token(user_id: Uuid, email: &str, expires_in: i64, secret: &[u8]) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = TokenClaims {
        user_id,
        email: email.to_string(),
        exp: now + expires_in,
        iat: now,
    };

    let payload = serde_json::to_vec(&claims).unwrap_or_default();
    sign_token(&payload, secret)
}

fn sign_token(payload: &[u8], secret: &[u8]) -> String {
    let payload_b64 = base64_url_encode(payload);

    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(payload_b64.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!("{}.{}", payload_b64, base64_url_encode(&signature))
}

fn base64_url_encode(data: &[u8]) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    URL_SAFE_NO_PAD.encode(data)
}

fn base64_url_decode(s: &str) -> Option<Vec<u8>> {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    URL_SAFE_NO_PAD.decode(s).ok()
}

/// Bearer token middleware for protected routes.
///
/// Valid claims go into the request extensions for handlers and into the
/// response extensions so the logging middleware can tag the user.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").ok_or(v));

    match token {
        Some(Ok(token)) => match validate_token(token, state.token_secret.as_bytes()) {
            Some(claims) => {
                debug!("[Auth] Valid token for athlete: {}", claims.user_id);
                request.extensions_mut().insert(claims.clone());

                let mut response = next.run(request).await;
                response.extensions_mut().insert(claims);
                response
            }
            None => {
                warn!("[Auth] Invalid or expired token");
                unauthorized_response("Token is invalid or expired")
            }
        },
        Some(Err(_)) => {
            warn!("[Auth] Invalid Authorization header format");
            unauthorized_response("Invalid Authorization header format")
        }
        None => {
            debug!("[Auth] No Authorization header");
            unauthorized_response("Missing access token")
        }
    }
}

fn unauthorized_response(description: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, r#"Bearer realm="FitMatch""#)],
        Json(ErrorResponse::new(error_types::INVALID_TOKEN, description)),
    )
        .into_response()
}

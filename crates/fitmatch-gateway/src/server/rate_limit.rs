//! Fixed-window rate limiting for credential checks.
//!
//! Buckets are keyed by route prefix. Only `/login` is limited: the billing
//! webhook delivers in bursts and a 429 there would only defer activation to
//! the provider's retry schedule.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn per_minute(max_requests: u32) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(60),
        }
    }
}

/// Shared rate limiter state
#[derive(Clone)]
pub struct RateLimiter {
    /// Route prefix → (window_start, request_count)
    buckets: Arc<DashMap<String, (Instant, u32)>>,
    rules: Arc<Vec<(String, RateLimitConfig)>>,
}

impl RateLimiter {
    pub fn new(rules: Vec<(String, RateLimitConfig)>) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            rules: Arc::new(rules),
        }
    }

    /// Returns `true` if the request is within limits
    pub fn check(&self, path: &str) -> bool {
        let Some((prefix, config)) = self.rules.iter().find(|(prefix, _)| path.starts_with(prefix.as_str())) else {
            return true;
        };

        let mut entry = self
            .buckets
            .entry(prefix.clone())
            .or_insert_with(|| (Instant::now(), 0));
        let (window_start, count) = entry.value_mut();

        if window_start.elapsed() >= config.window {
            *window_start = Instant::now();
            *count = 1;
            return true;
        }

        if *count >= config.max_requests {
            return false;
        }

        *count += 1;
        true
    }
}

pub async fn rate_limit_middleware(request: Request, next: Next) -> Response {
    let limiter = request.extensions().get::<RateLimiter>().cloned();

    if let Some(limiter) = limiter {
        let path = request.uri().path();
        if !limiter.check(path) {
            warn!(path = %path, "[RateLimit] Request rejected");
            return ApiError::TooManyRequests.into_response();
        }
    }

    next.run(request).await
}

/// 20 login attempts per minute
pub fn default_rate_limiter() -> RateLimiter {
    RateLimiter::new(vec![("/login".to_string(), RateLimitConfig::per_minute(20))])
}

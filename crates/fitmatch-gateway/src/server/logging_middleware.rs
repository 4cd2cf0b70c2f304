//! HTTP Request/Response Logging Middleware
//!
//! One entry and one exit line per request, correlated by trace ID. Bodies
//! are logged at DEBUG with credentials redacted.

use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use http_body_util::BodyExt;
use tracing::{debug, warn, Instrument};

use crate::auth::TokenClaims;
use crate::logging::TraceContext;

/// Maximum body size to log (1MB)
const MAX_BODY_LOG_SIZE: usize = 1024 * 1024;

/// Paths whose request bodies carry passwords
const SENSITIVE_PATHS: &[&str] = &["/login", "/athletes"];

/// Paths whose bodies are only logged by size
const SKIP_BODY_PATHS: &[&str] = &["/subscriptions/webhook"];

const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "stripe-signature"];

/// Exact match: `/athletes/likes` bodies are harmless
pub fn is_sensitive_path(path: &str) -> bool {
    SENSITIVE_PATHS.contains(&path.trim_end_matches('/'))
}

fn should_skip_body(path: &str) -> bool {
    SKIP_BODY_PATHS.iter().any(|p| path.starts_with(p))
}

/// Compact header list for DEBUG output
pub fn redact_headers_compact(headers: &axum::http::HeaderMap) -> String {
    headers
        .iter()
        .filter(|(name, _)| {
            matches!(
                name.as_str(),
                "content-type" | "user-agent" | "authorization" | "stripe-signature"
            )
        })
        .map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                format!("{}=[REDACTED]", name)
            } else {
                format!("{}={:?}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_body(bytes: &[u8], redact: bool) -> String {
    if redact {
        return "[REDACTED]".to_string();
    }

    if bytes.is_empty() {
        return "[empty]".to_string();
    }

    if bytes.len() > MAX_BODY_LOG_SIZE {
        return format!("[{} bytes]", bytes.len());
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
                return serde_json::to_string(&json).unwrap_or_else(|_| text.to_string());
            }
            if text.len() > 200 {
                let cut = (0..=200).rev().find(|i| text.is_char_boundary(*i)).unwrap_or(0);
                format!("{}...", &text[..cut])
            } else {
                text.to_string()
            }
        }
        Err(_) => format!("[binary: {} bytes]", bytes.len()),
    }
}

/// The `error` key of an error body, for the exit line
pub fn extract_error_key(bytes: &[u8]) -> Option<String> {
    let json: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    json.get("error")
        .and_then(|e| e.as_str())
        .map(String::from)
}

pub async fn http_logging_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let is_sensitive = is_sensitive_path(&path);
    let skip_body = should_skip_body(&path);

    let ctx = TraceContext::new(&method, &path);
    let span = ctx.span();

    async move {
        ctx.log_start();
        debug!(
            trace_id = %ctx.trace_id,
            headers = %redact_headers_compact(request.headers()),
            "Request headers"
        );

        let (parts, body) = request.into_parts();
        let body_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(trace_id = %ctx.trace_id, "Failed to read request body: {}", e);
                return Err(StatusCode::BAD_REQUEST);
            }
        };

        if !body_bytes.is_empty() {
            let rendered = if skip_body {
                format!("[{} bytes]", body_bytes.len())
            } else {
                format_body(&body_bytes, is_sensitive)
            };
            debug!(trace_id = %ctx.trace_id, body = %rendered, "Request body");
        }

        let request = Request::from_parts(parts, Body::from(body_bytes));
        let response = next.run(request).await;

        let (parts, body) = response.into_parts();
        let status = parts.status;

        let body_bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(trace_id = %ctx.trace_id, "Failed to read response body: {}", e);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        if !body_bytes.is_empty() && body_bytes.len() < 1000 {
            debug!(
                trace_id = %ctx.trace_id,
                body = %format_body(&body_bytes, false),
                "Response body"
            );
        }

        let ctx = match parts.extensions.get::<TokenClaims>() {
            Some(claims) => ctx.with_athlete(claims.user_id),
            None => ctx,
        };
        let error_key = if status.is_success() {
            None
        } else {
            extract_error_key(&body_bytes)
        };
        ctx.log_finish(status.as_u16(), error_key.as_deref());

        Ok(Response::from_parts(parts, Body::from(body_bytes)))
    }
    .instrument(span)
    .await
}

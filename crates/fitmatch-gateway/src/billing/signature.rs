//! Webhook signature verification
//!
//! Header format: `t=<unix ts>,v1=<hex hmac>[,v1=...]`. The signed message is
//! `"{t}.{raw body}"` keyed with the endpoint's webhook secret.

use fitmatch_core::{keys, DomainError, DomainResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a delivery in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Verify `header` against `payload` at time `now`
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance_secs: i64,
    now: i64,
) -> DomainResult<()> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse::<i64>().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| rejected("missing timestamp"))?;
    if signatures.is_empty() {
        return Err(rejected("no v1 signature"));
    }
    let tolerance = u64::try_from(tolerance_secs).unwrap_or(0);
    if now.abs_diff(timestamp) > tolerance {
        debug!(timestamp, now, "[Billing] Webhook timestamp outside tolerance");
        return Err(rejected("timestamp outside tolerance"));
    }

    let mac = signed_mac(payload, timestamp, secret);
    let valid = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| mac.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if valid {
        Ok(())
    } else {
        Err(rejected("signature mismatch"))
    }
}

/// Produce a header value for `payload`, as the provider would
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signature = signed_mac(payload, timestamp, secret).finalize().into_bytes();
    format!("t={},v1={}", timestamp, hex::encode(signature))
}

fn signed_mac(payload: &[u8], timestamp: i64, secret: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

fn rejected(reason: &str) -> DomainError {
    DomainError::billing(keys::INVALID_SIGNATURE, reason)
}

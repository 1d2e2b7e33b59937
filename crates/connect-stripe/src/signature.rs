//! # Webhook Signature Verification
//!
//! Stripe signs each delivery with `Stripe-Signature: t=<unix>,v1=<hex>`,
//! where `v1 = hex(HMAC-SHA256(secret, "<t>.<raw body>"))`. Several `v1`
//! entries may be present while a secret is being rolled.

use chrono::Utc;
use connect_core::{ConnectError, ConnectResult};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed delivery, in seconds
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

#[derive(Debug)]
struct SignatureHeader {
    timestamp: i64,
    signatures: Vec<Vec<u8>>,
}

fn parse_signature_header(header: &str) -> ConnectResult<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            // Entries that are not valid hex can never match; skip them
            "v1" => signatures.extend(hex::decode(value).ok()),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| {
        ConnectError::WebhookVerificationFailed("Missing timestamp in signature".to_string())
    })?;

    if signatures.is_empty() {
        return Err(ConnectError::WebhookVerificationFailed(
            "No v1 signature found".to_string(),
        ));
    }

    Ok(SignatureHeader {
        timestamp,
        signatures,
    })
}

fn signing_mac(secret: &str, timestamp: i64, payload: &[u8]) -> ConnectResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ConnectError::Internal(format!("HMAC key rejected: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac)
}

/// Hex-encoded `v1` signature for a payload signed at `timestamp`
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> ConnectResult<String> {
    let mac = signing_mac(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Build a complete `Stripe-Signature` header value, as Stripe would send it
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> ConnectResult<String> {
    Ok(format!(
        "t={},v1={}",
        timestamp,
        compute_signature(secret, timestamp, payload)?
    ))
}

/// Verify a delivery against the current clock
pub fn verify_signature(payload: &[u8], header: &str, secret: &str) -> ConnectResult<()> {
    verify_signature_at(
        payload,
        header,
        secret,
        Utc::now().timestamp(),
        DEFAULT_TOLERANCE_SECS,
    )
}

/// Verify a delivery as of `now` (unix seconds)
pub fn verify_signature_at(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> ConnectResult<()> {
    let parsed = parse_signature_header(header)?;
    let mac = signing_mac(secret, parsed.timestamp, payload)?;

    // verify_slice compares in constant time
    let valid = parsed
        .signatures
        .iter()
        .any(|sig| mac.clone().verify_slice(sig).is_ok());

    if !valid {
        return Err(ConnectError::WebhookVerificationFailed(
            "Signature mismatch".to_string(),
        ));
    }

    // Only deliveries older than the tolerance are refused
    if now.saturating_sub(parsed.timestamp) > tolerance_secs {
        return Err(ConnectError::WebhookVerificationFailed(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    Ok(())
}

//! Webhook signature verification.
//!
//! Stripe signs each delivery with HMAC-SHA256 over `"{timestamp}.{payload}"`
//! and sends the result in the `Stripe-Signature` header:
//!
//! ```text
//! t=1700000000,v1=5257a869e7ec...,v0=...
//! ```
//!
//! More than one `v1` entry can appear while a secret is being rolled.

use super::Event;
use crate::error::WebhookError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const SIGNATURE_HEADER: &str = "Stripe-Signature";
const EXPECTED_SCHEME: &str = "v1";

type HmacSha256 = Hmac<Sha256>;

/// Splits the header into its timestamp and `v1` signatures.
pub fn parse_signature_header(header: &str) -> Result<(i64, Vec<String>), WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            EXPECTED_SCHEME => signatures.push(value.to_string()),
            _ => {}
        }
    }

    match timestamp {
        Some(timestamp) if !signatures.is_empty() => Ok((timestamp, signatures)),
        _ => Err(WebhookError::InvalidSignature(
            "unable to extract timestamp and signatures from header".to_string(),
        )),
    }
}

pub fn compute_signature(payload: &str, secret: &str, timestamp: i64) -> Result<String, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| WebhookError::InvalidSignature(format!("bad webhook secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks `header` against `payload`. `now` is a unix timestamp; deliveries
/// older than `tolerance` seconds are refused.
pub fn verify_header(payload: &str, header: &str, secret: &str, tolerance: i64, now: i64) -> Result<(), WebhookError> {
    let (timestamp, signatures) = parse_signature_header(header)?;
    let expected = compute_signature(payload, secret, timestamp)?;

    let matched = signatures
        .iter()
        .any(|candidate| bool::from(expected.as_bytes().ct_eq(candidate.as_bytes())));
    if !matched {
        return Err(WebhookError::InvalidSignature(
            "no signatures found matching the expected signature for payload".to_string(),
        ));
    }

    if tolerance > 0 && timestamp < now - tolerance {
        return Err(WebhookError::InvalidSignature(format!(
            "timestamp {} outside the tolerance zone",
            timestamp
        )));
    }
    Ok(())
}

/// Verifies a raw delivery and decodes it. The body must be UTF-8, carry a
/// valid signature and parse as an event, in that order.
pub fn construct_event(
    payload: &[u8],
    header: Option<&str>,
    secret: Option<&str>,
    tolerance: i64,
) -> Result<Event, WebhookError> {
    let payload = std::str::from_utf8(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;
    let header = header.ok_or_else(|| WebhookError::InvalidSignature(format!("missing {} header", SIGNATURE_HEADER)))?;
    let secret = secret.ok_or_else(|| WebhookError::InvalidSignature("STRIPE_WEBHOOK_SECRET is not configured".to_string()))?;

    verify_header(payload, header, secret, tolerance, chrono::Utc::now().timestamp())?;

    serde_json::from_str(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &str = r#"{"id":"evt_1","type":"payment_intent.succeeded","created":1700000000,"data":{"object":{"id":"pi_1","amount":2300,"status":"succeeded"}}}"#;

    fn header_for(payload: &str, secret: &str, timestamp: i64) -> String {
        format!("t={},v1={}", timestamp, compute_signature(payload, secret, timestamp).unwrap())
    }

    #[test]
    fn parses_timestamp_and_all_v1_signatures() {
        let (timestamp, signatures) = parse_signature_header("t=1609459200,v1=abc,v0=old,v1=def").unwrap();
        assert_eq!(timestamp, 1609459200);
        assert_eq!(signatures, vec!["abc", "def"]);
    }

    #[test]
    fn rejects_headers_without_timestamp_or_signature() {
        assert!(parse_signature_header("invalid").is_err());
        assert!(parse_signature_header("v1=abc").is_err());
        assert!(parse_signature_header("t=1609459200").is_err());
        assert!(parse_signature_header("t=soon,v1=abc").is_err());
    }

    #[test]
    fn accepts_a_fresh_valid_signature() {
        let now = 1_700_000_000;
        let header = header_for(PAYLOAD, SECRET, now);
        assert!(verify_header(PAYLOAD, &header, SECRET, 300, now + 10).is_ok());
    }

    #[test]
    fn accepts_when_any_v1_matches() {
        let now = 1_700_000_000;
        let good = compute_signature(PAYLOAD, SECRET, now).unwrap();
        let header = format!("t={},v1=deadbeef,v1={}", now, good);
        assert!(verify_header(PAYLOAD, &header, SECRET, 300, now).is_ok());
    }

    #[test]
    fn rejects_wrong_secret_and_modified_payload() {
        let now = 1_700_000_000;
        let header = header_for(PAYLOAD, "whsec_other", now);
        assert!(matches!(
            verify_header(PAYLOAD, &header, SECRET, 300, now),
            Err(WebhookError::InvalidSignature(_))
        ));

        let header = header_for(PAYLOAD, SECRET, now);
        let tampered = PAYLOAD.replace("2300", "1");
        assert!(matches!(
            verify_header(&tampered, &header, SECRET, 300, now),
            Err(WebhookError::InvalidSignature(_))
        ));
    }

    #[test]
    fn rejects_stale_deliveries() {
        let signed_at = 1_700_000_000;
        let header = header_for(PAYLOAD, SECRET, signed_at);
        assert!(verify_header(PAYLOAD, &header, SECRET, 300, signed_at + 301).is_err());
        assert!(verify_header(PAYLOAD, &header, SECRET, 0, signed_at + 86_400).is_ok());
    }

    #[test]
    fn construct_event_decodes_verified_payloads() {
        let header = header_for(PAYLOAD, SECRET, chrono::Utc::now().timestamp());
        let event = construct_event(PAYLOAD.as_bytes(), Some(&header), Some(SECRET), 300).unwrap();
        assert_eq!(event.id, "evt_1");
        assert!(event.is_payment_succeeded());
        let intent = event.payment_intent().unwrap();
        assert_eq!(intent.id, "pi_1");
        assert_eq!(intent.amount, 2300);
    }

    #[test]
    fn construct_event_classifies_failures() {
        let now = chrono::Utc::now().timestamp();

        let err = construct_event(&[0xff, 0xfe], Some("t=1,v1=a"), Some(SECRET), 300).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidPayload(_)));

        let garbage = "not json";
        let header = header_for(garbage, SECRET, now);
        let err = construct_event(garbage.as_bytes(), Some(&header), Some(SECRET), 300).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidPayload(_)));

        let err = construct_event(PAYLOAD.as_bytes(), None, Some(SECRET), 300).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature(_)));

        let header = header_for(PAYLOAD, SECRET, now);
        let err = construct_event(PAYLOAD.as_bytes(), Some(&header), None, 300).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature(_)));
    }
}

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::services::fulfillment;
use crate::error::AppError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

pub async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Validation("Missing signature header".into()))?;

    if !verify_signature(&state.config.payment_webhook_secret, signature, &body) {
        warn!("Webhook rejected: invalid signature");
        return Err(AppError::Validation("Invalid signature".into()));
    }

    let event: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("Malformed webhook payload".into()))?;

    let event_type = event["type"].as_str().unwrap_or_default().to_string();
    let object_id = event["data"]["object"]["id"].as_str().unwrap_or_default().to_string();

    match event_type.as_str() {
        "checkout.session.completed" => {
            if object_id.is_empty() {
                return Err(AppError::Validation("Webhook event has no object id".into()));
            }
            info!("Webhook: session {} completed", object_id);
            fulfillment::complete_session(&state, &object_id).await?;
        }
        "payment_intent.payment_failed" => {
            if object_id.is_empty() {
                return Err(AppError::Validation("Webhook event has no object id".into()));
            }
            fulfillment::mark_payment_failed(&state, &object_id).await?;
        }
        other => {
            // The provider sends every event type the account subscribes to;
            // acknowledging unknown ones stops pointless redelivery.
            info!("Webhook: ignoring event type {}", other);
        }
    }

    Ok(Json(json!({ "received": true })))
}

/// Checks a `t=<unix>,v1=<hex>` header against HMAC-SHA256 of `"{t}.{body}"`.
fn verify_signature(secret: &str, header: &str, body: &[u8]) -> bool {
    let mut timestamp = None;
    let mut candidates = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value.to_string()),
            Some(("v1", value)) => candidates.push(value.to_string()),
            _ => {}
        }
    }

    let Some(timestamp) = timestamp else {
        return false;
    };
    if candidates.is_empty() {
        return false;
    }

    candidates.iter().any(|candidate| {
        let Ok(decoded) = hex::decode(candidate) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        mac.verify_slice(&decoded).is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(timestamp: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn accepts_valid_signature() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = format!("t=1700000000,v1={}", sign("1700000000", body));
        assert!(verify_signature(SECRET, &header, body));
    }

    #[test]
    fn accepts_valid_signature_among_multiple_candidates() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = format!("t=1700000000,v1=deadbeef,v1={}", sign("1700000000", body));
        assert!(verify_signature(SECRET, &header, body));
    }

    #[test]
    fn rejects_tampered_body() {
        let body = br#"{"type":"checkout.session.completed"}"#;
        let header = format!("t=1700000000,v1={}", sign("1700000000", body));
        assert!(!verify_signature(SECRET, &header, b"{}"));
    }

    #[test]
    fn rejects_missing_timestamp() {
        let body = b"{}";
        let header = format!("v1={}", sign("1700000000", body));
        assert!(!verify_signature(SECRET, &header, body));
    }

    #[test]
    fn rejects_garbage_header() {
        assert!(!verify_signature(SECRET, "not-a-signature", b"{}"));
    }
}

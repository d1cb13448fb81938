mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{parse_body, TestApp};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tower::ServiceExt;

const WEBHOOK_SECRET: &str = "whsec_test_secret";

fn sign(body: &str) -> String {
    let timestamp = "1700000000";
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body.as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

async fn deliver(app: &TestApp, body: String, signature: Option<String>) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/payment")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header("Stripe-Signature", signature);
    }
    app.router
        .clone()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

fn simple_cart() -> serde_json::Value {
    json!([
        { "kind": "product", "id": "p1", "title": "Gift box", "price": 50.0, "quantity": 1 },
        { "kind": "experience", "id": "e1", "title": "Spa morning", "price": 240.0, "quantity": 1,
          "date": "2026-09-08", "time": "09:00", "guests": 2, "addOns": [] }
    ])
}

async fn paid_session(app: &TestApp, email: &str) -> String {
    let payload = json!({
        "items": simple_cart(),
        "customer": { "name": "Nadia Benali", "email": email }
    });
    let response = app.post_json("/api/v1/checkout/session", &payload).await;
    let session_id = parse_body(response).await["sessionId"].as_str().unwrap().to_string();
    app.payment.mark_paid(&session_id);
    session_id
}

#[tokio::test]
async fn valid_completed_event_materializes_the_session() {
    let app = TestApp::new().await;
    let session_id = paid_session(&app, "hook@example.com").await;

    let body = json!({
        "type": "checkout.session.completed",
        "data": { "object": { "id": session_id } }
    })
    .to_string();

    let response = deliver(&app, body.clone(), Some(sign(&body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["received"], json!(true));

    let orders = parse_body(app.get("/api/v1/orders").await).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
    let bookings = parse_body(app.get("/api/v1/bookings").await).await;
    assert_eq!(bookings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_signature_is_rejected_before_processing() {
    let app = TestApp::new().await;
    let session_id = paid_session(&app, "forged@example.com").await;

    let body = json!({
        "type": "checkout.session.completed",
        "data": { "object": { "id": session_id } }
    })
    .to_string();

    let response = deliver(&app, body, Some("t=1700000000,v1=deadbeef".to_string())).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let orders = parse_body(app.get("/api/v1/orders").await).await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let app = TestApp::new().await;
    let body = json!({ "type": "checkout.session.completed" }).to_string();
    let response = deliver(&app, body, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_event_types_are_acknowledged() {
    let app = TestApp::new().await;
    let body = json!({
        "type": "customer.subscription.updated",
        "data": { "object": { "id": "sub_123" } }
    })
    .to_string();

    let response = deliver(&app, body.clone(), Some(sign(&body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["received"], json!(true));
}

#[tokio::test]
async fn payment_failed_event_flips_records() {
    let app = TestApp::new().await;
    let session_id = paid_session(&app, "failed@example.com").await;

    // Materialize first, then simulate the async failure notification.
    let response = app.post_json("/api/v1/checkout/complete", &json!({ "sessionId": session_id })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let intent = app.payment.payment_intent_of(&session_id).unwrap();
    let body = json!({
        "type": "payment_intent.payment_failed",
        "data": { "object": { "id": intent } }
    })
    .to_string();

    let response = deliver(&app, body.clone(), Some(sign(&body))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let orders = parse_body(app.get("/api/v1/orders").await).await;
    assert_eq!(orders.as_array().unwrap()[0]["status"], json!("payment_failed"));
    let bookings = parse_body(app.get("/api/v1/bookings").await).await;
    assert_eq!(bookings.as_array().unwrap()[0]["status"], json!("payment_failed"));
}

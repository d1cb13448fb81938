use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{availability, backoffice, checkout, experience, health, webhook};
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Public catalogue & availability
        .route("/api/v1/experiences", get(experience::list_experiences).post(backoffice::create_experience))
        .route("/api/v1/availability", get(availability::get_availability))

        // Checkout
        .route("/api/v1/checkout/session", post(checkout::create_session))
        .route("/api/v1/checkout/complete", post(checkout::complete_session))

        // Provider webhook
        .route("/api/v1/webhooks/payment", post(webhook::payment_webhook))

        // Back-office
        .route("/api/v1/experiences/{id}", axum::routing::put(backoffice::update_experience).delete(backoffice::delete_experience))
        .route("/api/v1/experiences/{id}/recurring", get(backoffice::list_rules).post(backoffice::create_rule))
        .route("/api/v1/experiences/{id}/recurring/{rule_id}", delete(backoffice::delete_rule))
        .route("/api/v1/experiences/{id}/overrides", get(backoffice::list_overrides).post(backoffice::upsert_override))
        .route("/api/v1/experiences/{id}/overrides/{date}", delete(backoffice::delete_override))
        .route("/api/v1/reservations", post(backoffice::create_reservation))
        .route("/api/v1/orders", get(backoffice::list_orders))
        .route("/api/v1/bookings", get(backoffice::list_bookings))
        .route("/api/v1/clients", get(backoffice::list_clients))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}

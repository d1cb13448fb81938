use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::{
    requests::{CompleteCheckoutRequest, CreateCheckoutRequest},
    responses::{CheckoutCompleteResponse, CheckoutSessionResponse},
};
use crate::domain::ports::{CreateSessionParams, SessionLineItem};
use crate::domain::services::{checkout, fulfillment};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateCheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::Validation("Cart is empty".into()));
    }
    if payload.customer.email.is_empty() {
        return Err(AppError::Validation("Customer email is required".into()));
    }

    let metadata = checkout::encode_metadata(
        &payload.items,
        &payload.customer,
        payload.shipping.as_ref(),
        payload.special_requests.as_deref(),
        payload.auth_user_id.as_deref(),
    )?;

    let line_items: Vec<SessionLineItem> = payload
        .items
        .iter()
        .map(|item| SessionLineItem {
            name: item.title().to_string(),
            unit_amount: item.unit_amount_cents(),
            quantity: item.quantity(),
        })
        .collect();

    let session = state
        .payment_service
        .create_session(CreateSessionParams {
            line_items,
            metadata,
            customer_email: payload.customer.email.clone(),
            currency: checkout::DEFAULT_CURRENCY.to_string(),
        })
        .await?;

    info!("Checkout session {} created for {}", session.id, payload.customer.email);

    Ok(Json(CheckoutSessionResponse {
        client_secret: session.client_secret,
        session_id: session.id,
        total_amount: session.amount_total,
    }))
}

pub async fn complete_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CompleteCheckoutRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = fulfillment::complete_session(&state, &payload.session_id).await?;

    Ok(Json(CheckoutCompleteResponse {
        orders: outcome.order_ids,
        bookings: outcome.booking_ids,
        client_id: outcome.client_id,
    }))
}

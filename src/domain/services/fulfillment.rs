use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::domain::models::{
    booking::{Booking, NewBookingParams},
    cart::CartItem,
    client::{Client, NewClientParams},
    order::{NewOrderParams, Order, OrderLineItem},
};
use crate::domain::services::checkout::{self, DecodedSession};
use crate::error::AppError;
use crate::state::AppState;

pub struct FulfillmentOutcome {
    pub order_ids: Vec<String>,
    pub booking_ids: Vec<String>,
    pub client_id: String,
}

/// Turns a completed payment session into durable records. Shared by the
/// client-triggered completion call and the provider webhook, so it must be
/// idempotent: a session that already produced an Order or Booking performs no
/// further writes and returns the existing ids.
pub async fn complete_session(state: &AppState, session_id: &str) -> Result<FulfillmentOutcome, AppError> {
    let session = state.payment_service.retrieve_session(session_id).await?;

    if !checkout::session_is_complete(&session.status, &session.payment_status) {
        return Err(AppError::Payment("Payment not completed".to_string()));
    }

    let existing_order = state.order_repo.find_by_session(session_id).await?;
    let existing_bookings = state.booking_repo.list_by_session(session_id).await?;

    if existing_order.is_some() || !existing_bookings.is_empty() {
        info!("Session {} already materialized, skipping writes", session_id);

        let email = existing_order
            .as_ref()
            .map(|o| o.customer_email.clone())
            .or_else(|| existing_bookings.first().map(|b| b.customer_email.clone()))
            .unwrap_or_default();
        let client_id = state
            .client_repo
            .find_by_email(&email)
            .await?
            .map(|c| c.id)
            .unwrap_or_default();

        return Ok(FulfillmentOutcome {
            order_ids: existing_order.into_iter().map(|o| o.id).collect(),
            booking_ids: existing_bookings.into_iter().map(|b| b.id).collect(),
            client_id,
        });
    }

    let decoded = checkout::decode_metadata(&session.metadata)?;

    let (products, experiences): (Vec<CartItem>, Vec<CartItem>) = decoded
        .items
        .iter()
        .cloned()
        .partition(|item| matches!(item, CartItem::Product { .. }));

    let grand_total = checkout::grand_total(&decoded.items);
    let currency = if session.currency.is_empty() {
        checkout::DEFAULT_CURRENCY.to_string()
    } else {
        session.currency.clone()
    };

    let client = upsert_client(state, &decoded, grand_total, !products.is_empty(), experiences.len() as i64).await?;

    let mut order_ids = Vec::new();
    if !products.is_empty() {
        let line_items: Vec<OrderLineItem> = products
            .iter()
            .map(|item| match item {
                CartItem::Product { id, title, price, quantity } => OrderLineItem {
                    id: id.clone(),
                    title: title.clone(),
                    price: *price,
                    quantity: *quantity,
                },
                CartItem::Experience { .. } => unreachable!("partitioned above"),
            })
            .collect();

        let order_total: f64 = products.iter().map(CartItem::line_total).sum();
        let sequence = state.order_repo.next_sequence().await?;
        let order = Order::new(NewOrderParams {
            sequence,
            customer_name: decoded.customer.name.clone(),
            customer_email: decoded.customer.email.clone(),
            customer_phone: decoded.customer.phone.clone(),
            items: line_items,
            total: order_total,
            currency: currency.clone(),
            session_id: session_id.to_string(),
            payment_intent_id: session.payment_intent.clone(),
            shipping_json: decoded
                .shipping
                .as_ref()
                .and_then(|s| serde_json::to_string(s).ok()),
            auth_user_id: decoded.auth_user_id.clone(),
        });

        let created = state.order_repo.create(&order).await?;
        info!("Order {} created for session {}", created.id, session_id);
        order_ids.push(created.id);
    }

    let mut booking_ids = Vec::new();
    for item in &experiences {
        if let CartItem::Experience { id, title, date, time, guests, add_ons, .. } = item {
            let parsed_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| AppError::Validation(format!("Invalid booking date in metadata: {}", date)))?;

            let booking = Booking::new(NewBookingParams {
                customer_name: decoded.customer.name.clone(),
                customer_email: decoded.customer.email.clone(),
                customer_phone: decoded.customer.phone.clone(),
                experience_id: id.clone(),
                experience_title: title.clone(),
                date: parsed_date,
                time: time.clone(),
                guests: *guests as i32,
                add_ons_json: (!add_ons.is_empty())
                    .then(|| serde_json::to_string(add_ons).ok())
                    .flatten(),
                total: item.line_total(),
                currency: currency.clone(),
                session_id: session_id.to_string(),
                payment_intent_id: session.payment_intent.clone(),
                special_requests: decoded.special_requests.clone(),
            });

            let created = state.booking_repo.create(&booking).await?;
            info!("Booking {} created for session {}", created.id, session_id);
            booking_ids.push(created.id);
        }
    }

    send_confirmation_email(state, &decoded, &order_ids, &booking_ids).await;

    Ok(FulfillmentOutcome {
        order_ids,
        booking_ids,
        client_id: client.id,
    })
}

async fn upsert_client(
    state: &AppState,
    decoded: &DecodedSession,
    grand_total: f64,
    has_products: bool,
    experience_count: i64,
) -> Result<Client, AppError> {
    match state.client_repo.find_by_email(&decoded.customer.email).await? {
        Some(mut client) => {
            client.total_spent += grand_total;
            // Any number of product lines still counts as one order.
            if has_products {
                client.orders_count += 1;
            }
            client.reservations_count += experience_count;
            client.last_order_date = Utc::now();
            state.client_repo.update(&client).await
        }
        None => {
            let client = Client::new(NewClientParams {
                name: decoded.customer.name.clone(),
                email: decoded.customer.email.clone(),
                phone: decoded.customer.phone.clone(),
                total_spent: grand_total,
                orders_count: i64::from(has_products),
                reservations_count: experience_count,
            });
            state.client_repo.create(&client).await
        }
    }
}

/// Confirmation mail is a side effect: a failure here is logged and swallowed so it
/// can never roll back the records created above.
async fn send_confirmation_email(
    state: &AppState,
    decoded: &DecodedSession,
    order_ids: &[String],
    booking_ids: &[String],
) {
    let mut context = tera::Context::new();
    context.insert("customer_name", &decoded.customer.name);
    context.insert("order_ids", order_ids);
    context.insert("booking_ids", booking_ids);

    let template = if booking_ids.is_empty() {
        "order_confirmation.html"
    } else {
        "booking_confirmation.html"
    };

    let html = match state.templates.render(template, &context) {
        Ok(html) => html,
        Err(e) => {
            warn!("Failed to render confirmation template: {}", e);
            return;
        }
    };

    if let Err(e) = state
        .email_service
        .send(&decoded.customer.email, "Your Escapade confirmation", &html)
        .await
    {
        warn!("Confirmation email failed (not fatal): {}", e);
    }
}

/// Webhook path for `payment_intent.payment_failed`: flips any order or booking
/// carrying this payment intent to `payment_failed`.
pub async fn mark_payment_failed(state: &AppState, payment_intent_id: &str) -> Result<(), AppError> {
    let orders = state.order_repo.mark_payment_failed(payment_intent_id).await?;
    let bookings = state.booking_repo.mark_payment_failed(payment_intent_id).await?;
    info!(
        "Payment failed for intent {}: {} orders, {} bookings updated",
        payment_intent_id, orders, bookings
    );
    Ok(())
}

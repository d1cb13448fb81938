use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub items_json: String,
    pub total: f64,
    pub currency: String,
    pub status: String,
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    pub shipping_json: Option<String>,
    pub auth_user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OrderLineItem {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub quantity: u32,
}

pub struct NewOrderParams {
    pub sequence: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub items: Vec<OrderLineItem>,
    pub total: f64,
    pub currency: String,
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    pub shipping_json: Option<String>,
    pub auth_user_id: Option<String>,
}

impl Order {
    pub fn new(params: NewOrderParams) -> Self {
        Self {
            id: format!("ORD-{:04}", params.sequence),
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            customer_phone: params.customer_phone,
            items_json: serde_json::to_string(&params.items).unwrap_or_else(|_| "[]".to_string()),
            total: params.total,
            currency: params.currency,
            status: "paid".to_string(),
            session_id: params.session_id,
            payment_intent_id: params.payment_intent_id,
            shipping_json: params.shipping_json,
            auth_user_id: params.auth_user_id,
            created_at: Utc::now(),
        }
    }
}

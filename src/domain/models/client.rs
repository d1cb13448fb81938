use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Per-customer running totals, upserted by email on every completed checkout.
/// This is an accumulator, not a ledger: counters only ever grow.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub total_spent: f64,
    pub orders_count: i64,
    pub reservations_count: i64,
    pub last_order_date: DateTime<Utc>,
    pub join_date: DateTime<Utc>,
    pub status: String,
    pub source: String,
    pub notes: Option<String>,
    pub tags_json: String,
}

pub struct NewClientParams {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub total_spent: f64,
    pub orders_count: i64,
    pub reservations_count: i64,
}

impl Client {
    pub fn new(params: NewClientParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            email: params.email,
            phone: params.phone,
            total_spent: params.total_spent,
            orders_count: params.orders_count,
            reservations_count: params.reservations_count,
            last_order_date: now,
            join_date: now,
            status: "active".to_string(),
            source: "checkout".to_string(),
            notes: None,
            tags_json: "[]".to_string(),
        }
    }
}

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub experience_id: String,
    pub experience_title: String,
    pub date: NaiveDate,
    pub time: String,
    pub guests: i32,
    pub add_ons_json: Option<String>,
    pub total: f64,
    pub currency: String,
    pub status: String,
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub experience_id: String,
    pub experience_title: String,
    pub date: NaiveDate,
    pub time: String,
    pub guests: i32,
    pub add_ons_json: Option<String>,
    pub total: f64,
    pub currency: String,
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    pub special_requests: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            customer_phone: params.customer_phone,
            experience_id: params.experience_id,
            experience_title: params.experience_title,
            date: params.date,
            time: params.time,
            guests: params.guests,
            add_ons_json: params.add_ons_json,
            total: params.total,
            currency: params.currency,
            status: "confirmed".to_string(),
            session_id: params.session_id,
            payment_intent_id: params.payment_intent_id,
            special_requests: params.special_requests,
            created_at: Utc::now(),
        }
    }
}

use serde::Serialize;

use crate::domain::services::availability::DateSlots;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub slots: Vec<DateSlots>,
    pub duration_hours: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub client_secret: Option<String>,
    pub session_id: String,
    /// Provider-reported total in minor units.
    pub total_amount: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCompleteResponse {
    pub orders: Vec<String>,
    pub bookings: Vec<String>,
    pub client_id: String,
}

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::cart::CartItem;
use crate::domain::services::checkout::CustomerDetails;

#[derive(Deserialize)]
pub struct ExperienceListQuery {
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub slug: Option<String>,
    /// `available=false` includes experiences flagged `unavailable`.
    pub available: Option<bool>,
}

/// Public availability query. Fields arrive in the storefront's camelCase wire form.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub experience_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub items: Vec<CartItem>,
    pub customer: CustomerDetails,
    pub shipping: Option<serde_json::Value>,
    pub special_requests: Option<String>,
    pub auth_user_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteCheckoutRequest {
    pub session_id: String,
}

#[derive(Deserialize)]
pub struct CreateExperienceRequest {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration_hours: Option<f64>,
    pub price: f64,
    pub currency: Option<String>,
    pub status: String,
    pub is_featured: Option<bool>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateExperienceRequest {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub duration_hours: Option<f64>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub is_featured: Option<bool>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct TimeWindowInput {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize)]
pub struct CreateRuleRequest {
    pub weekdays: Vec<u32>,
    pub start_time: String,
    pub end_time: String,
    pub time_slots: Option<Vec<TimeWindowInput>>,
}

#[derive(Deserialize)]
pub struct UpsertOverrideRequest {
    pub date: NaiveDate,
    pub is_blocked: Option<bool>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Deserialize)]
pub struct OverrideRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct CreateReservationRequest {
    pub experience_id: String,
    pub date: NaiveDate,
    pub time: String,
}

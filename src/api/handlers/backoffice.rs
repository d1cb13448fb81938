use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{
    CreateExperienceRequest, CreateReservationRequest, CreateRuleRequest,
    OverrideRangeQuery, UpdateExperienceRequest, UpsertOverrideRequest,
};
use crate::domain::models::{
    availability::{RecurringRule, RuleTimeSlot, SpecificAvailability},
    experience::{is_valid_status, Experience, NewExperienceParams},
    reservation::Reservation,
};
use crate::domain::services::checkout::DEFAULT_CURRENCY;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_experience(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateExperienceRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !is_valid_status(&payload.status) {
        return Err(AppError::Validation(format!("Invalid status: {}", payload.status)));
    }

    let experience = Experience::new(NewExperienceParams {
        slug: payload.slug,
        title: payload.title,
        description: payload.description,
        category: payload.category,
        duration_hours: payload.duration_hours,
        price: payload.price,
        currency: payload.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        status: payload.status,
        is_featured: payload.is_featured.unwrap_or(false),
        image_url: payload.image_url.unwrap_or_default(),
    });

    let created = state.experience_repo.create(&experience).await?;
    info!("Experience created: {} ({})", created.slug, created.id);
    Ok(Json(created))
}

pub async fn update_experience(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateExperienceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut experience = state.experience_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Experience not found".into()))?;

    if let Some(slug) = payload.slug { experience.slug = slug; }
    if let Some(title) = payload.title { experience.title = title; }
    if let Some(description) = payload.description { experience.description = description; }
    if let Some(category) = payload.category { experience.category = category; }
    if let Some(duration) = payload.duration_hours { experience.duration_hours = Some(duration); }
    if let Some(price) = payload.price { experience.price = price; }
    if let Some(currency) = payload.currency { experience.currency = currency; }
    if let Some(status) = payload.status {
        if !is_valid_status(&status) {
            return Err(AppError::Validation(format!("Invalid status: {}", status)));
        }
        experience.status = status;
    }
    if let Some(featured) = payload.is_featured { experience.is_featured = featured; }
    if let Some(image_url) = payload.image_url { experience.image_url = image_url; }

    let updated = state.experience_repo.update(&experience).await?;
    Ok(Json(updated))
}

pub async fn delete_experience(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.experience_repo.delete(&id).await?;
    info!("Experience deleted: {}", id);
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    Path(experience_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let rules = state.availability_repo.list_rules(&experience_id).await?;
    let body: Vec<serde_json::Value> = rules
        .into_iter()
        .map(|(rule, slots)| {
            serde_json::json!({
                "id": rule.id,
                "weekdays": rule.weekdays(),
                "start_time": rule.start_time,
                "end_time": rule.end_time,
                "active": rule.active,
                "time_slots": slots,
            })
        })
        .collect();
    Ok(Json(body))
}

pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    Path(experience_id): Path<String>,
    Json(payload): Json<CreateRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.weekdays.iter().any(|d| *d > 6) {
        return Err(AppError::Validation("Weekdays must be 0-6 (Sunday = 0)".into()));
    }

    state.experience_repo.find_by_id(&experience_id).await?
        .ok_or(AppError::NotFound("Experience not found".into()))?;

    let rule = RecurringRule::new(
        experience_id,
        &payload.weekdays,
        payload.start_time,
        payload.end_time,
    );

    let slots: Vec<RuleTimeSlot> = payload
        .time_slots
        .unwrap_or_default()
        .into_iter()
        .map(|w| RuleTimeSlot::new(rule.id.clone(), w.start_time, w.end_time))
        .collect();

    let created = state.availability_repo.create_rule(&rule, &slots).await?;
    info!("Recurring rule {} created for experience {}", created.id, created.experience_id);
    Ok(Json(created))
}

pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    Path((experience_id, rule_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.availability_repo.delete_rule(&experience_id, &rule_id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

pub async fn list_overrides(
    State(state): State<Arc<AppState>>,
    Path(experience_id): Path<String>,
    Query(query): Query<OverrideRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let start = query.start_date.unwrap_or_else(|| Utc::now().date_naive());
    let end = query.end_date.unwrap_or(start + Duration::days(365));
    let overrides = state.availability_repo.list_specific(&experience_id, start, end).await?;
    Ok(Json(overrides))
}

pub async fn upsert_override(
    State(state): State<Arc<AppState>>,
    Path(experience_id): Path<String>,
    Json(payload): Json<UpsertOverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.start_time.is_some() != payload.end_time.is_some() {
        return Err(AppError::Validation("start_time and end_time must be set together".into()));
    }

    let mut entry = SpecificAvailability::new(experience_id, payload.date);
    entry.is_blocked = payload.is_blocked.unwrap_or(false);
    entry.start_time = payload.start_time;
    entry.end_time = payload.end_time;

    let saved = state.availability_repo.upsert_specific(&entry).await?;
    info!("Availability override saved for {} on {}", saved.experience_id, saved.date);
    Ok(Json(saved))
}

pub async fn delete_override(
    State(state): State<Arc<AppState>>,
    Path((experience_id, date)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()))?;
    state.availability_repo.delete_specific(&experience_id, date).await?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.experience_repo.find_by_id(&payload.experience_id).await?
        .ok_or(AppError::NotFound("Experience not found".into()))?;

    let reservation = Reservation::new(payload.experience_id, payload.date, payload.time);
    let created = state.reservation_repo.create(&reservation).await?;
    info!("Manual reservation {} created for {}", created.id, created.date);
    Ok(Json(created))
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.order_repo.list().await?))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.booking_repo.list().await?))
}

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.client_repo.list().await?))
}

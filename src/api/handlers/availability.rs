use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

use crate::api::dtos::{requests::AvailabilityQuery, responses::AvailabilityResponse};
use crate::domain::services::availability::{effective_duration, resolve_range, ResolverInputs};
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let experience_id = query
        .experience_id
        .ok_or_else(|| AppError::Validation("experienceId is required".into()))?;
    let start = parse_date(query.start_date.as_deref(), "startDate")?;
    let end = parse_date(query.end_date.as_deref(), "endDate")?;

    if start > end {
        return Err(AppError::Validation("startDate must not be after endDate".into()));
    }

    // A missing row resolves with the default duration rather than failing the
    // whole calendar view.
    let experience = state.experience_repo.find_by_id(&experience_id).await?;
    let duration_hours = effective_duration(experience.and_then(|e| e.duration_hours));

    let rules = state.availability_repo.list_rules(&experience_id).await?;
    let specifics = state.availability_repo.list_specific(&experience_id, start, end).await?;
    let occupancy = state.reservation_repo.list_occupancy(start, end).await?;

    let occupied_dates: HashSet<NaiveDate> = occupancy.iter().map(|row| row.date).collect();
    let reserved_times: HashSet<(NaiveDate, String)> = occupancy
        .iter()
        .filter(|row| row.experience_id == experience_id)
        .map(|row| (row.date, row.time.clone()))
        .collect();

    let slots = resolve_range(start, end, &ResolverInputs {
        duration_hours,
        rules: &rules,
        specifics: &specifics,
        occupied_dates: &occupied_dates,
        reserved_times: &reserved_times,
    });

    Ok(Json(AvailabilityResponse { slots, duration_hours }))
}

fn parse_date(raw: Option<&str>, field: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.ok_or_else(|| AppError::Validation(format!("{} is required", field)))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{} must be YYYY-MM-DD", field)))
}

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::dtos::requests::ExperienceListQuery;
use crate::domain::models::experience::STATUS_UNAVAILABLE;
use crate::error::AppError;
use crate::state::AppState;

/// Public catalogue listing. Unavailable experiences are hidden unless the caller
/// opts in with `available=false`.
pub async fn list_experiences(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ExperienceListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let mut experiences = state.experience_repo.list().await?;

    if query.available != Some(false) {
        experiences.retain(|e| e.status != STATUS_UNAVAILABLE);
    }
    if let Some(featured) = query.featured {
        experiences.retain(|e| e.is_featured == featured);
    }
    if let Some(category) = &query.category {
        experiences.retain(|e| &e.category == category);
    }
    if let Some(slug) = &query.slug {
        experiences.retain(|e| &e.slug == slug);
    }

    Ok((
        [(header::CACHE_CONTROL, "public, max-age=60")],
        Json(experiences),
    ))
}

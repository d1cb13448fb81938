use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_AVAILABLE: &str = "available";
pub const STATUS_ALMOST_AVAILABLE: &str = "almost_available";
pub const STATUS_COMING_SOON: &str = "coming_soon";
pub const STATUS_UNAVAILABLE: &str = "unavailable";

pub fn is_valid_status(status: &str) -> bool {
    matches!(
        status,
        STATUS_AVAILABLE | STATUS_ALMOST_AVAILABLE | STATUS_COMING_SOON | STATUS_UNAVAILABLE
    )
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Experience {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration_hours: Option<f64>,
    pub price: f64,
    pub currency: String,
    pub status: String,
    pub is_featured: bool,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewExperienceParams {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub duration_hours: Option<f64>,
    pub price: f64,
    pub currency: String,
    pub status: String,
    pub is_featured: bool,
    pub image_url: String,
}

impl Experience {
    pub fn new(params: NewExperienceParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            slug: params.slug,
            title: params.title,
            description: params.description,
            category: params.category,
            duration_hours: params.duration_hours,
            price: params.price,
            currency: params.currency,
            status: params.status,
            is_featured: params.is_featured,
            image_url: params.image_url,
            created_at: Utc::now(),
        }
    }
}

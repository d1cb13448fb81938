use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Legacy occupancy row, kept alongside the newer bookings table. Both feed the
/// availability resolver.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Reservation {
    pub id: String,
    pub experience_id: String,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn new(experience_id: String, date: NaiveDate, time: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            experience_id,
            date,
            time,
            status: "confirmed".to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Projection of a non-cancelled reservation or booking, merged from both tables.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct OccupancyRow {
    pub experience_id: String,
    pub date: NaiveDate,
    pub time: String,
}

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A standing weekly offer pattern for one experience. Weekdays are stored as a
/// JSON array of 0-6 (Sunday = 0). Explicit windows live in `availability_time_slots`;
/// a rule without any falls back to its own start/end.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RecurringRule {
    pub id: String,
    pub experience_id: String,
    pub weekdays_json: String,
    pub start_time: String,
    pub end_time: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl RecurringRule {
    pub fn new(experience_id: String, weekdays: &[u32], start_time: String, end_time: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            experience_id,
            weekdays_json: serde_json::to_string(weekdays).unwrap_or_else(|_| "[]".to_string()),
            start_time,
            end_time,
            active: true,
            created_at: Utc::now(),
        }
    }

    pub fn weekdays(&self) -> Vec<u32> {
        serde_json::from_str(&self.weekdays_json).unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RuleTimeSlot {
    pub id: String,
    pub rule_id: String,
    pub start_time: String,
    pub end_time: String,
}

impl RuleTimeSlot {
    pub fn new(rule_id: String, start_time: String, end_time: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rule_id,
            start_time,
            end_time,
        }
    }
}

/// Date-scoped override. A blocked row short-circuits the whole date; a row with a
/// window supersedes the recurring rules for that date.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct SpecificAvailability {
    pub id: String,
    pub experience_id: String,
    pub date: NaiveDate,
    pub is_blocked: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SpecificAvailability {
    pub fn new(experience_id: String, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            experience_id,
            date,
            is_blocked: false,
            start_time: None,
            end_time: None,
            created_at: Utc::now(),
        }
    }
}

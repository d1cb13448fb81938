use crate::domain::{
    models::availability::{RecurringRule, RuleTimeSlot, SpecificAvailability},
    ports::AvailabilityRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteAvailabilityRepo {
    pool: SqlitePool,
}

impl SqliteAvailabilityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for SqliteAvailabilityRepo {
    async fn create_rule(&self, rule: &RecurringRule, slots: &[RuleTimeSlot]) -> Result<RecurringRule, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, RecurringRule>(
            "INSERT INTO recurring_availability (id, experience_id, weekdays_json, start_time, end_time, active, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&rule.id).bind(&rule.experience_id).bind(&rule.weekdays_json)
            .bind(&rule.start_time).bind(&rule.end_time).bind(rule.active).bind(rule.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for slot in slots {
            sqlx::query("INSERT INTO availability_time_slots (id, rule_id, start_time, end_time) VALUES (?, ?, ?, ?)")
                .bind(&slot.id).bind(&slot.rule_id).bind(&slot.start_time).bind(&slot.end_time)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn list_rules(&self, experience_id: &str) -> Result<Vec<(RecurringRule, Vec<RuleTimeSlot>)>, AppError> {
        let rules = sqlx::query_as::<_, RecurringRule>(
            "SELECT * FROM recurring_availability WHERE experience_id = ? ORDER BY created_at ASC"
        )
            .bind(experience_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;

        let mut out = Vec::with_capacity(rules.len());
        for rule in rules {
            let slots = sqlx::query_as::<_, RuleTimeSlot>(
                "SELECT * FROM availability_time_slots WHERE rule_id = ? ORDER BY start_time ASC"
            )
                .bind(&rule.id).fetch_all(&self.pool).await.map_err(AppError::Database)?;
            out.push((rule, slots));
        }
        Ok(out)
    }

    async fn delete_rule(&self, experience_id: &str, rule_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM availability_time_slots WHERE rule_id = ?")
            .bind(rule_id).execute(&mut *tx).await.map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM recurring_availability WHERE id = ? AND experience_id = ?")
            .bind(rule_id).bind(experience_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Recurring rule not found".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn upsert_specific(&self, entry: &SpecificAvailability) -> Result<SpecificAvailability, AppError> {
        sqlx::query_as::<_, SpecificAvailability>(
            "INSERT INTO specific_availability (id, experience_id, date, is_blocked, start_time, end_time, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(experience_id, date) DO UPDATE SET
             is_blocked=excluded.is_blocked,
             start_time=excluded.start_time,
             end_time=excluded.end_time
             RETURNING *"
        )
            .bind(&entry.id).bind(&entry.experience_id).bind(entry.date)
            .bind(entry.is_blocked).bind(&entry.start_time).bind(&entry.end_time).bind(entry.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_specific(&self, experience_id: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<SpecificAvailability>, AppError> {
        sqlx::query_as::<_, SpecificAvailability>(
            "SELECT * FROM specific_availability WHERE experience_id = ? AND date >= ? AND date <= ?"
        )
            .bind(experience_id).bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_specific(&self, experience_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM specific_availability WHERE experience_id = ? AND date = ?")
            .bind(experience_id).bind(date).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Specific availability not found".into()));
        }
        Ok(())
    }
}

use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, customer_name, customer_email, customer_phone, experience_id, experience_title, date, time, guests, add_ons_json, total, currency, status, session_id, payment_intent_id, special_requests, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.customer_phone)
            .bind(&booking.experience_id).bind(&booking.experience_title).bind(booking.date).bind(&booking.time)
            .bind(booking.guests).bind(&booking.add_ons_json).bind(booking.total).bind(&booking.currency)
            .bind(&booking.status).bind(&booking.session_id).bind(&booking.payment_intent_id)
            .bind(&booking.special_requests).bind(booking.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_session(&self, session_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE session_id = ?")
            .bind(session_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn mark_payment_failed(&self, payment_intent_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE bookings SET status = 'payment_failed' WHERE payment_intent_id = ?")
            .bind(payment_intent_id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}

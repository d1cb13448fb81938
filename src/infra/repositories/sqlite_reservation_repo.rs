use crate::domain::{
    models::reservation::{OccupancyRow, Reservation},
    ports::ReservationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteReservationRepo {
    pool: SqlitePool,
}

impl SqliteReservationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepo {
    async fn create(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, experience_id, date, time, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.experience_id).bind(reservation.date)
            .bind(&reservation.time).bind(&reservation.status).bind(reservation.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_occupancy(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<OccupancyRow>, AppError> {
        // Both tables feed the resolver; cancelled rows never count as occupancy.
        sqlx::query_as::<_, OccupancyRow>(
            "SELECT experience_id, date, time FROM reservations WHERE date >= ? AND date <= ? AND status != 'cancelled'
             UNION ALL
             SELECT experience_id, date, time FROM bookings WHERE date >= ? AND date <= ? AND status != 'cancelled'"
        )
            .bind(start).bind(end).bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}

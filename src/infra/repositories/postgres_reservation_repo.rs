use crate::domain::{
    models::reservation::{OccupancyRow, Reservation},
    ports::ReservationRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresReservationRepo {
    pool: PgPool,
}

impl PostgresReservationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepo {
    async fn create(&self, reservation: &Reservation) -> Result<Reservation, AppError> {
        sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, experience_id, date, time, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.experience_id).bind(reservation.date)
            .bind(&reservation.time).bind(&reservation.status).bind(reservation.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_occupancy(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<OccupancyRow>, AppError> {
        // Both tables feed the resolver; cancelled rows never count as occupancy.
        sqlx::query_as::<_, OccupancyRow>(
            "SELECT experience_id, date, time FROM reservations WHERE date >= $1 AND date <= $2 AND status != 'cancelled'
             UNION ALL
             SELECT experience_id, date, time FROM bookings WHERE date >= $3 AND date <= $4 AND status != 'cancelled'"
        )
            .bind(start).bind(end).bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}

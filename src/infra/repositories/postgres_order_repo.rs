use crate::domain::{models::order::Order, ports::OrderRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Row};

pub struct PostgresOrderRepo {
    pool: PgPool,
}

impl PostgresOrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepo {
    async fn create(&self, order: &Order) -> Result<Order, AppError> {
        sqlx::query_as::<_, Order>(
            "INSERT INTO orders (id, customer_name, customer_email, customer_phone, items_json, total, currency, status, session_id, payment_intent_id, shipping_json, auth_user_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *"
        )
            .bind(&order.id).bind(&order.customer_name).bind(&order.customer_email).bind(&order.customer_phone)
            .bind(&order.items_json).bind(order.total).bind(&order.currency).bind(&order.status)
            .bind(&order.session_id).bind(&order.payment_intent_id).bind(&order.shipping_json)
            .bind(&order.auth_user_id).bind(order.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Order>, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_session(&self, session_id: &str) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE session_id = $1")
            .bind(session_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn next_sequence(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM orders")
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(row.get::<i64, _>("count") + 1)
    }

    async fn mark_payment_failed(&self, payment_intent_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE orders SET status = 'payment_failed' WHERE payment_intent_id = $1")
            .bind(payment_intent_id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}

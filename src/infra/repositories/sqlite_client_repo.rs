use crate::domain::{models::client::Client, ports::ClientRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteClientRepo {
    pool: SqlitePool,
}

impl SqliteClientRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepo {
    async fn create(&self, client: &Client) -> Result<Client, AppError> {
        sqlx::query_as::<_, Client>(
            "INSERT INTO clients (id, name, email, phone, total_spent, orders_count, reservations_count, last_order_date, join_date, status, source, notes, tags_json)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&client.id).bind(&client.name).bind(&client.email).bind(&client.phone)
            .bind(client.total_spent).bind(client.orders_count).bind(client.reservations_count)
            .bind(client.last_order_date).bind(client.join_date).bind(&client.status)
            .bind(&client.source).bind(&client.notes).bind(&client.tags_json)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, client: &Client) -> Result<Client, AppError> {
        sqlx::query_as::<_, Client>(
            "UPDATE clients SET name=?, phone=?, total_spent=?, orders_count=?, reservations_count=?, last_order_date=?, status=?, notes=?, tags_json=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&client.name).bind(&client.phone).bind(client.total_spent)
            .bind(client.orders_count).bind(client.reservations_count).bind(client.last_order_date)
            .bind(&client.status).bind(&client.notes).bind(&client.tags_json)
            .bind(&client.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, AppError> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE email = ?")
            .bind(email).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Client>, AppError> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY join_date DESC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}

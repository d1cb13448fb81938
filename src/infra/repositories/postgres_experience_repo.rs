use crate::domain::{models::experience::Experience, ports::ExperienceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresExperienceRepo {
    pool: PgPool,
}

impl PostgresExperienceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExperienceRepository for PostgresExperienceRepo {
    async fn create(&self, experience: &Experience) -> Result<Experience, AppError> {
        sqlx::query_as::<_, Experience>(
            "INSERT INTO experiences (id, slug, title, description, category, duration_hours, price, currency, status, is_featured, image_url, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *"
        )
            .bind(&experience.id).bind(&experience.slug).bind(&experience.title).bind(&experience.description)
            .bind(&experience.category).bind(experience.duration_hours).bind(experience.price).bind(&experience.currency)
            .bind(&experience.status).bind(experience.is_featured).bind(&experience.image_url).bind(experience.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Experience>, AppError> {
        sqlx::query_as::<_, Experience>("SELECT * FROM experiences WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Experience>, AppError> {
        sqlx::query_as::<_, Experience>("SELECT * FROM experiences WHERE slug = $1")
            .bind(slug).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Experience>, AppError> {
        sqlx::query_as::<_, Experience>("SELECT * FROM experiences ORDER BY created_at ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, experience: &Experience) -> Result<Experience, AppError> {
        sqlx::query_as::<_, Experience>(
            "UPDATE experiences SET slug=$1, title=$2, description=$3, category=$4, duration_hours=$5, price=$6, currency=$7, status=$8, is_featured=$9, image_url=$10
             WHERE id=$11
             RETURNING *"
        )
            .bind(&experience.slug).bind(&experience.title).bind(&experience.description).bind(&experience.category)
            .bind(experience.duration_hours).bind(experience.price).bind(&experience.currency).bind(&experience.status)
            .bind(experience.is_featured).bind(&experience.image_url)
            .bind(&experience.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Experience not found".into()));
        }
        Ok(())
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::Result;
use crate::modules::catalog::models::SalonService;

#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// Service menu ordered by name
    async fn list(&self) -> Result<Vec<SalonService>>;

    async fn insert(&self, name: &str) -> Result<SalonService>;

    /// Returns whether a service with that name existed
    async fn delete_by_name(&self, name: &str) -> Result<bool>;
}

pub struct PgServiceRepository {
    pool: PgPool,
}

impl PgServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PgServiceRepository {
    async fn list(&self) -> Result<Vec<SalonService>> {
        let services = sqlx::query_as::<_, SalonService>(
            "SELECT id, name, created_at FROM services ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    async fn insert(&self, name: &str) -> Result<SalonService> {
        let service = sqlx::query_as::<_, SalonService>(
            "INSERT INTO services (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(service)
    }

    async fn delete_by_name(&self, name: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM services WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

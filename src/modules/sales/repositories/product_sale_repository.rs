use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::core::Result;
use crate::modules::sales::models::ProductSale;

#[async_trait]
pub trait ProductSaleRepository: Send + Sync {
    /// Record the sale and decrement stock in the database
    async fn record(&self, product_id: i64, quantity: i32) -> Result<ProductSale>;

    /// Ledger rows with `start <= created_at <= end`, oldest first
    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ProductSale>>;
}

pub struct PgProductSaleRepository {
    pool: PgPool,
}

impl PgProductSaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductSaleRepository for PgProductSaleRepository {
    async fn record(&self, product_id: i64, quantity: i32) -> Result<ProductSale> {
        let sale = sqlx::query_as::<_, ProductSale>(
            "SELECT id, product_id, quantity, total, created_at FROM register_product_sale($1, $2)",
        )
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(sale)
    }

    async fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ProductSale>> {
        let rows = sqlx::query_as::<_, ProductSale>(
            r#"
            SELECT id, product_id, quantity, total, created_at
            FROM product_sales
            WHERE created_at >= $1 AND created_at <= $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

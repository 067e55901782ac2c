use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::Result;
use crate::modules::catalog::models::{NewProduct, Product, ProductPatch};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products ordered by name
    async fn list(&self) -> Result<Vec<Product>>;

    /// Case-insensitive substring match on the name
    async fn search(&self, query: &str) -> Result<Vec<Product>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>>;

    /// Products whose id is in `ids`; unknown ids are skipped
    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>>;

    async fn insert(&self, product: &NewProduct) -> Result<Product>;

    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>>;

    async fn delete(&self, id: i64) -> Result<bool>;
}

const PRODUCT_COLUMNS: &str = "id, name, quantity, unit_price, discount_percent, created_at";

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so the query is matched literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE name ILIKE $1 ORDER BY name ASC"
        ))
        .bind(like_pattern(query.trim()))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn insert(&self, product: &NewProduct) -> Result<Product> {
        let created = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, quantity, unit_price, discount_percent)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.name.trim())
        .bind(product.quantity)
        .bind(product.unit_price)
        .bind(product.discount_percent)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Option<Product>> {
        let updated = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                quantity = COALESCE($3, quantity),
                unit_price = COALESCE($4, unit_price),
                discount_percent = COALESCE($5, discount_percent)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name.as_deref().map(str::trim))
        .bind(patch.quantity)
        .bind(patch.unit_price)
        .bind(patch.discount_percent)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

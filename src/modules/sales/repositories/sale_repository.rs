use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::sales::models::{CreatedSale, SaleDraft, SaleItem, SaleRecord};

/// Arguments of the `get_sales_summary` stored function
#[derive(Debug, Clone)]
pub struct SummaryProcedureArgs {
    pub filter_type: String,
    pub employee_id: Option<Uuid>,
    pub day: Option<String>,
    pub week: Option<i32>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub limit: i32,
    pub offset: i32,
    /// IANA name of the business timezone the windows are evaluated in
    pub tz: String,
}

#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Sale records oldest first, optionally for one employee
    async fn list_records(&self, employee_id: Option<Uuid>) -> Result<Vec<SaleRecord>>;

    /// Sale records with `start <= sale_date <= end`
    async fn list_records_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleRecord>>;

    /// Line items belonging to any of `sale_ids`
    async fn list_items(&self, sale_ids: &[i64]) -> Result<Vec<SaleItem>>;

    /// Write the record and its items in one transaction
    async fn create_sale(&self, draft: &SaleDraft) -> Result<CreatedSale>;

    /// Run the database-side summary and return its JSON untouched
    async fn summary_procedure(&self, args: &SummaryProcedureArgs) -> Result<serde_json::Value>;
}

const RECORD_COLUMNS: &str =
    "id, sale_code, payment_method, total_amount, earnings_amount, employee_id, sale_date";

const ITEM_COLUMNS: &str = "id, sale_id, service_name, unit_cost, quantity, employee_earnings";

pub struct PgSaleRepository {
    pool: PgPool,
}

impl PgSaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SaleRepository for PgSaleRepository {
    async fn list_records(&self, employee_id: Option<Uuid>) -> Result<Vec<SaleRecord>> {
        let records = sqlx::query_as::<_, SaleRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM sale_records
            WHERE ($1::uuid IS NULL OR employee_id = $1)
            ORDER BY sale_date ASC, id ASC
            "#
        ))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_records_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleRecord>> {
        let records = sqlx::query_as::<_, SaleRecord>(&format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM sale_records
            WHERE sale_date >= $1 AND sale_date <= $2
            ORDER BY sale_date ASC, id ASC
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_items(&self, sale_ids: &[i64]) -> Result<Vec<SaleItem>> {
        if sale_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = sqlx::query_as::<_, SaleItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = ANY($1) ORDER BY id ASC"
        ))
        .bind(sale_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn create_sale(&self, draft: &SaleDraft) -> Result<CreatedSale> {
        let mut tx = self.pool.begin().await?;

        let sale = sqlx::query_as::<_, SaleRecord>(&format!(
            r#"
            INSERT INTO sale_records
                (sale_code, payment_method, total_amount, earnings_amount, employee_id, sale_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(&draft.sale_code)
        .bind(draft.payment_method.as_str())
        .bind(draft.total_amount)
        .bind(draft.earnings_amount)
        .bind(draft.employee_id)
        .bind(draft.sale_date)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(draft.items.len());
        for item in &draft.items {
            let created = sqlx::query_as::<_, SaleItem>(&format!(
                r#"
                INSERT INTO sale_items (sale_id, service_name, unit_cost, quantity, employee_earnings)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {ITEM_COLUMNS}
                "#
            ))
            .bind(sale.id)
            .bind(&item.service_name)
            .bind(item.unit_cost)
            .bind(item.quantity)
            .bind(item.employee_earnings)
            .fetch_one(&mut *tx)
            .await?;
            items.push(created);
        }

        tx.commit().await?;

        Ok(CreatedSale { sale, items })
    }

    async fn summary_procedure(&self, args: &SummaryProcedureArgs) -> Result<serde_json::Value> {
        let data = sqlx::query_scalar::<_, Option<serde_json::Value>>(
            "SELECT get_sales_summary($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(args.employee_id)
        .bind(args.day.as_deref())
        .bind(args.week)
        .bind(args.month)
        .bind(args.year)
        .bind(args.limit)
        .bind(args.offset)
        .bind(&args.filter_type)
        .bind(&args.tz)
        .fetch_one(&self.pool)
        .await?;

        Ok(data.unwrap_or_else(|| serde_json::Value::Array(Vec::new())))
    }
}

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::Result;
use crate::modules::loans::models::{LoanEntry, LoanOperation, LoanQuery};

#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Ledger rows matching `query`, newest first
    async fn list(&self, query: &LoanQuery) -> Result<Vec<LoanEntry>>;

    async fn insert(
        &self,
        employee_id: Uuid,
        operation: LoanOperation,
        amount: Decimal,
    ) -> Result<LoanEntry>;
}

pub struct PgLoanRepository {
    pool: PgPool,
}

impl PgLoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepository for PgLoanRepository {
    async fn list(&self, query: &LoanQuery) -> Result<Vec<LoanEntry>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, employee_id, operation, amount, created_at FROM loan_entries WHERE TRUE",
        );

        if let Some(employee_id) = query.employee_id {
            builder.push(" AND employee_id = ").push_bind(employee_id);
        }
        if let Some((start, end)) = query.range {
            builder
                .push(" AND created_at >= ")
                .push_bind(start)
                .push(" AND created_at < ")
                .push_bind(end);
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let entries = builder
            .build_query_as::<LoanEntry>()
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    async fn insert(
        &self,
        employee_id: Uuid,
        operation: LoanOperation,
        amount: Decimal,
    ) -> Result<LoanEntry> {
        let entry = sqlx::query_as::<_, LoanEntry>(
            r#"
            INSERT INTO loan_entries (employee_id, operation, amount)
            VALUES ($1, $2, $3)
            RETURNING id, employee_id, operation, amount, created_at
            "#,
        )
        .bind(employee_id)
        .bind(operation.as_str())
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }
}

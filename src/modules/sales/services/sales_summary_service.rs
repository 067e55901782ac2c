use std::sync::Arc;

use chrono_tz::Tz;
use tracing::debug;

use crate::core::timezone::BusinessClock;
use crate::core::Result;
use crate::modules::sales::models::EmployeeSalesSummary;
use crate::modules::sales::repositories::{SaleRepository, SummaryProcedureArgs};
use crate::modules::sales::services::date_window::SalesFilterRequest;
use crate::modules::sales::services::sales_aggregator::summarize_sales;
use crate::modules::users::repositories::UserRepository;

/// Page size handed to the database-side summary
const PROCEDURE_PAGE_SIZE: i32 = 100;

/// Sales summaries, either aggregated here or by the `get_sales_summary` function
pub struct SalesSummaryService {
    users: Arc<dyn UserRepository>,
    sales: Arc<dyn SaleRepository>,
    tz: Tz,
}

impl SalesSummaryService {
    pub fn new(users: Arc<dyn UserRepository>, sales: Arc<dyn SaleRepository>, tz: Tz) -> Self {
        Self { users, sales, tz }
    }

    pub async fn summarize(&self, request: &SalesFilterRequest) -> Result<Vec<EmployeeSalesSummary>> {
        self.summarize_at(request, BusinessClock::new(self.tz)).await
    }

    /// Summaries evaluated against a fixed clock
    pub async fn summarize_at(
        &self,
        request: &SalesFilterRequest,
        clock: BusinessClock,
    ) -> Result<Vec<EmployeeSalesSummary>> {
        let window = request.window()?;

        let users = self.users.list_all().await?;
        let records = self.sales.list_records(request.user_id).await?;
        let sale_ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let items = self.sales.list_items(&sale_ids).await?;

        debug!(
            filter = request.filter_type.as_str(),
            users = users.len(),
            records = records.len(),
            "summarizing sales"
        );

        Ok(summarize_sales(
            &users,
            records,
            items,
            &window,
            &clock,
            request.user_id,
        ))
    }

    /// Delegate to the database-side summary
    pub async fn summarize_in_database(
        &self,
        request: &SalesFilterRequest,
    ) -> Result<serde_json::Value> {
        request.window()?;

        let args = SummaryProcedureArgs {
            filter_type: request.filter_type.as_str().to_string(),
            employee_id: request.user_id,
            day: request.day.clone(),
            week: request.week.and_then(|w| i32::try_from(w).ok()),
            month: request.month.and_then(|m| i32::try_from(m).ok()),
            year: request.year,
            limit: PROCEDURE_PAGE_SIZE,
            offset: 0,
            tz: self.tz.name().to_string(),
        };

        self.sales.summary_procedure(&args).await
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{Currency, Result};
use crate::modules::catalog::repositories::ProductRepository;
use crate::modules::loans::models::{LoanOperation, LoanQuery};
use crate::modules::loans::repositories::LoanRepository;
use crate::modules::reports::models::{
    compute_cut, CutPeriod, CutReport, CutReportRequest, EmployeeCut, ProductSalesLine,
    SettlementOutcome,
};
use crate::modules::reports::services::workbook::render_workbook;
use crate::modules::sales::models::ProductSale;
use crate::modules::sales::repositories::{ProductSaleRepository, SaleRepository};
use crate::modules::users::repositories::UserRepository;

/// Name shown for product ids that no longer exist
const MISSING_PRODUCT_NAME: &str = "—";

/// Workbook ready to send, with the report it was rendered from
#[derive(Debug, Clone)]
pub struct RenderedCut {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub report: CutReport,
}

/// Cash reconciliation between employee earnings and outstanding loans
pub struct CutReportService {
    users: Arc<dyn UserRepository>,
    loans: Arc<dyn LoanRepository>,
    sales: Arc<dyn SaleRepository>,
    product_sales: Arc<dyn ProductSaleRepository>,
    products: Arc<dyn ProductRepository>,
    currency: Currency,
}

impl CutReportService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        loans: Arc<dyn LoanRepository>,
        sales: Arc<dyn SaleRepository>,
        product_sales: Arc<dyn ProductSaleRepository>,
        products: Arc<dyn ProductRepository>,
        currency: Currency,
    ) -> Self {
        Self {
            users,
            loans,
            sales,
            product_sales,
            products,
            currency,
        }
    }

    /// Build and render the cut workbook for a request
    ///
    /// # Errors
    /// Returns a validation error for a missing or malformed `startDate`, and
    /// the underlying error when any query or the rendering fails. A failed
    /// settlement write is not an error; it is reported per employee.
    pub async fn generate(&self, request: &CutReportRequest) -> Result<RenderedCut> {
        self.generate_at(request, Utc::now()).await
    }

    /// Same as [`CutReportService::generate`] with an explicit "now"
    pub async fn generate_at(
        &self,
        request: &CutReportRequest,
        now: DateTime<Utc>,
    ) -> Result<RenderedCut> {
        let period = request.period(now)?;
        let mut report = self.build_report(&period, request.auto_settle()).await?;

        // Repayments are only written once every read and a first render succeeded
        if report.auto_settle {
            render_workbook(&report, self.currency)?;
            self.settle_all(&mut report).await;
        }
        let bytes = render_workbook(&report, self.currency)?;

        info!(
            start = %period.start,
            end = %period.end,
            employees = report.employees.len(),
            products = report.products.len(),
            settled = report.settlements_recorded(),
            settlement_failures = report.settlements_failed(),
            "cut report generated"
        );

        Ok(RenderedCut {
            filename: period.filename(),
            bytes,
            report,
        })
    }

    /// Compute every employee line and total product sales, without writing
    ///
    /// Debt is taken over the whole ledger; earnings only over the period.
    /// Lines that would be settled carry `NotRequested` until
    /// [`CutReportService::settle_all`] runs.
    pub async fn build_report(&self, period: &CutPeriod, auto_settle: bool) -> Result<CutReport> {
        let ledger = self.loans.list(&LoanQuery::default()).await?;
        let sales = self
            .sales
            .list_records_between(period.start, period.end)
            .await?;
        let users = self.users.list_all().await?;
        let product_sales = self
            .product_sales
            .list_between(period.start, period.end)
            .await?;
        let products = self.product_lines(product_sales).await?;

        let mut debt_by_employee: HashMap<Uuid, Decimal> = HashMap::new();
        for entry in &ledger {
            *debt_by_employee.entry(entry.employee_id).or_default() += entry.signed_amount();
        }

        let mut earnings_by_employee: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for sale in &sales {
            let totals = earnings_by_employee.entry(sale.employee_id).or_default();
            totals.0 += sale.total_amount;
            totals.1 += sale.earnings_amount;
        }

        let mut employees = Vec::with_capacity(users.len());
        for user in &users {
            let net_loan_balance = debt_by_employee.get(&user.id).copied().unwrap_or_default();
            let (total_earned, earnings_amount) = earnings_by_employee
                .get(&user.id)
                .copied()
                .unwrap_or_default();
            let amounts = compute_cut(net_loan_balance, earnings_amount);

            let settlement = if auto_settle && amounts.deducted <= Decimal::ZERO {
                SettlementOutcome::NothingToSettle
            } else {
                SettlementOutcome::NotRequested
            };

            employees.push(EmployeeCut {
                employee_id: user.id,
                full_name: user.full_name(),
                total_earned,
                earnings_amount,
                net_loan_balance,
                deducted: amounts.deducted,
                payable: amounts.payable,
                settlement,
            });
        }

        Ok(CutReport {
            start: period.start,
            end: period.end,
            auto_settle,
            employees,
            products,
        })
    }

    /// Write one repayment row per employee with something deducted
    pub async fn settle_all(&self, report: &mut CutReport) {
        for line in &mut report.employees {
            if line.deducted > Decimal::ZERO {
                line.settlement = self.settle(line.employee_id, line.deducted).await;
            }
        }
    }

    async fn settle(&self, employee_id: Uuid, amount: Decimal) -> SettlementOutcome {
        match self
            .loans
            .insert(employee_id, LoanOperation::Repayment, amount)
            .await
        {
            Ok(_) => {
                info!(employee_id = %employee_id, amount = %amount, "cut repayment recorded");
                SettlementOutcome::Recorded
            }
            Err(e) => {
                warn!(
                    employee_id = %employee_id,
                    amount = %amount,
                    error = %e,
                    "failed to record cut repayment"
                );
                SettlementOutcome::Failed(e.to_string())
            }
        }
    }

    /// Quantity and revenue per product, in the order products first sold
    async fn product_lines(&self, rows: Vec<ProductSale>) -> Result<Vec<ProductSalesLine>> {
        let mut lines: Vec<ProductSalesLine> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();

        for row in rows {
            let slot = *index.entry(row.product_id).or_insert_with(|| {
                lines.push(ProductSalesLine {
                    product_id: row.product_id,
                    name: MISSING_PRODUCT_NAME.to_string(),
                    quantity: 0,
                    revenue: Decimal::ZERO,
                });
                lines.len() - 1
            });
            lines[slot].quantity += i64::from(row.quantity);
            lines[slot].revenue += row.total;
        }

        let ids: Vec<i64> = lines.iter().map(|l| l.product_id).collect();
        let names: HashMap<i64, String> = self
            .products
            .list_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        for line in &mut lines {
            if let Some(name) = names.get(&line.product_id) {
                line.name = name.clone();
            }
        }

        Ok(lines)
    }
}

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

/// Body of the cut report endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutReportRequest {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    /// Record a repayment for every deducted amount
    #[serde(default, rename = "crearAbono", alias = "autoSettle")]
    pub auto_settle: Option<bool>,
}

impl CutReportRequest {
    /// Resolve the reporting period
    ///
    /// Only the first ten characters of each date are read. The range runs from
    /// `start 00:00:00Z` to `end 23:59:59Z`, or to `now` without an end date.
    pub fn period(&self, now: DateTime<Utc>) -> Result<CutPeriod> {
        let raw_start = self
            .start_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("startDate is required"))?;
        let start_date = parse_day(raw_start, "startDate")?;

        let end_date = match self.end_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_day(raw, "endDate")?),
            _ => None,
        };

        let start = Utc.from_utc_datetime(&start_date.and_time(NaiveTime::MIN));
        let end = match end_date {
            Some(day) => Utc.from_utc_datetime(&day.and_hms_opt(23, 59, 59).unwrap_or_default()),
            None => now,
        };

        if end < start {
            return Err(AppError::validation("endDate must not be before startDate"));
        }

        Ok(CutPeriod {
            start_date,
            end_date,
            start,
            end,
        })
    }

    pub fn auto_settle(&self) -> bool {
        self.auto_settle.unwrap_or(false)
    }
}

fn parse_day(raw: &str, field: &str) -> Result<NaiveDate> {
    let day: String = raw.chars().take(10).collect();
    NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!(
            "Invalid {} '{}'. Expected YYYY-MM-DD",
            field, raw
        ))
    })
}

/// Resolved reporting period, both bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutPeriod {
    pub start_date: NaiveDate,
    /// `None` when the report runs up to the moment it was requested
    pub end_date: Option<NaiveDate>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CutPeriod {
    /// `corte_<start>_<end|hoy>.xlsx`
    pub fn filename(&self) -> String {
        let end = self
            .end_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "hoy".to_string());
        format!("corte_{}_{}.xlsx", self.start_date.format("%Y-%m-%d"), end)
    }
}

/// Split of an employee's earnings between debt and payout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutAmounts {
    pub deducted: Decimal,
    pub payable: Decimal,
}

/// `deducted = min(net_loan_balance, earnings)` floored at zero and
/// `payable = max(earnings - deducted, 0)`
pub fn compute_cut(net_loan_balance: Decimal, earnings: Decimal) -> CutAmounts {
    let deducted = net_loan_balance.min(earnings).max(Decimal::ZERO);
    let payable = (earnings - deducted).max(Decimal::ZERO);
    CutAmounts { deducted, payable }
}

/// What happened to the automatic repayment for one employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// The request did not ask for settlement
    NotRequested,
    /// Nothing was deducted, so no row was written
    NothingToSettle,
    Recorded,
    /// The repayment row could not be written; the report is still produced
    Failed(String),
}

impl SettlementOutcome {
    /// Cell text for the settlement column
    pub fn label(&self) -> &'static str {
        match self {
            SettlementOutcome::NotRequested => "No",
            SettlementOutcome::NothingToSettle => "No aplica",
            SettlementOutcome::Recorded => "Sí",
            SettlementOutcome::Failed(_) => "Error",
        }
    }
}

/// One employee's line of the cut
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCut {
    pub employee_id: Uuid,
    pub full_name: String,
    /// Σ total_amount in range
    pub total_earned: Decimal,
    /// Σ earnings_amount in range
    pub earnings_amount: Decimal,
    /// All-time loans minus repayments, before this cut's settlement
    pub net_loan_balance: Decimal,
    pub deducted: Decimal,
    pub payable: Decimal,
    pub settlement: SettlementOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesLine {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CutReport {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub auto_settle: bool,
    pub employees: Vec<EmployeeCut>,
    pub products: Vec<ProductSalesLine>,
}

impl CutReport {
    pub fn settlements_recorded(&self) -> usize {
        self.employees
            .iter()
            .filter(|e| e.settlement == SettlementOutcome::Recorded)
            .count()
    }

    pub fn settlements_failed(&self) -> usize {
        self.employees
            .iter()
            .filter(|e| matches!(e.settlement, SettlementOutcome::Failed(_)))
            .count()
    }
}

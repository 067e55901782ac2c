use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Currency, Result};

/// Direction of a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanOperation {
    /// Money advanced to the employee
    #[serde(alias = "prestamo")]
    Loan,
    /// Money paid back, by hand or deducted from a cut
    #[serde(alias = "abono")]
    Repayment,
}

impl LoanOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanOperation::Loan => "loan",
            LoanOperation::Repayment => "repayment",
        }
    }
}

impl std::fmt::Display for LoanOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for LoanOperation {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        match s.as_str() {
            "loan" => Ok(LoanOperation::Loan),
            "repayment" => Ok(LoanOperation::Repayment),
            other => Err(format!("Invalid loan operation: {}", other)),
        }
    }
}

/// Append-only ledger row; balances are always recomputed from these
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoanEntry {
    pub id: i64,
    pub employee_id: Uuid,
    #[sqlx(try_from = "String")]
    pub operation: LoanOperation,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl LoanEntry {
    /// Contribution to the running balance: loans add, repayments subtract
    pub fn signed_amount(&self) -> Decimal {
        match self.operation {
            LoanOperation::Loan => self.amount,
            LoanOperation::Repayment => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoanEntry {
    pub employee_id: Uuid,
    pub operation: LoanOperation,
    pub amount: Decimal,
}

impl NewLoanEntry {
    pub fn validate(&self, currency: Currency) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(AppError::validation("amount must be greater than zero"));
        }
        currency
            .validate_amount(self.amount)
            .map_err(AppError::validation)
    }
}

/// Ledger selection; both filters are optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanQuery {
    pub employee_id: Option<Uuid>,
    /// Half-open `[start, end)`
    pub range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoanBalance {
    pub employee_id: Uuid,
    pub balance: Decimal,
}

use std::sync::Arc;

use chrono_tz::Tz;
use tracing::info;
use uuid::Uuid;

use crate::core::{AppError, Currency, Result};
use crate::modules::loans::models::{LoanBalance, LoanEntry, LoanQuery, NewLoanEntry};
use crate::modules::loans::repositories::LoanRepository;
use crate::modules::loans::services::loan_ledger::{net_balance, LedgerWindow};
use crate::modules::users::repositories::UserRepository;

/// Employee loan ledger
pub struct LoanService {
    loans: Arc<dyn LoanRepository>,
    users: Arc<dyn UserRepository>,
    tz: Tz,
    currency: Currency,
}

impl LoanService {
    pub fn new(
        loans: Arc<dyn LoanRepository>,
        users: Arc<dyn UserRepository>,
        tz: Tz,
        currency: Currency,
    ) -> Self {
        Self {
            loans,
            users,
            tz,
            currency,
        }
    }

    fn query(&self, employee_id: Option<Uuid>, window: Option<LedgerWindow>) -> LoanQuery {
        LoanQuery {
            employee_id,
            range: window.map(|w| w.range(self.tz)),
        }
    }

    /// Ledger rows newest first
    pub async fn list_entries(
        &self,
        employee_id: Option<Uuid>,
        window: Option<LedgerWindow>,
    ) -> Result<Vec<LoanEntry>> {
        self.loans.list(&self.query(employee_id, window)).await
    }

    /// Net balance of one employee, all-time unless a window is given
    pub async fn balance(
        &self,
        employee_id: Uuid,
        window: Option<LedgerWindow>,
    ) -> Result<LoanBalance> {
        let entries = self
            .loans
            .list(&self.query(Some(employee_id), window))
            .await?;

        Ok(LoanBalance {
            employee_id,
            balance: net_balance(&entries),
        })
    }

    /// Append a loan or repayment for an existing employee
    pub async fn record(&self, entry: NewLoanEntry) -> Result<LoanEntry> {
        entry.validate(self.currency)?;

        if self.users.find_by_id(entry.employee_id).await?.is_none() {
            return Err(AppError::not_found(format!("Employee {}", entry.employee_id)));
        }

        let created = self
            .loans
            .insert(entry.employee_id, entry.operation, entry.amount)
            .await?;

        info!(
            employee_id = %created.employee_id,
            operation = %created.operation,
            amount = %created.amount,
            "ledger entry recorded"
        );

        Ok(created)
    }
}

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::timezone::local_midnight_utc;
use crate::modules::loans::models::LoanEntry;

/// Size of a ledger window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBucket {
    #[default]
    #[serde(alias = "dia")]
    Day,
    #[serde(alias = "semana")]
    Week,
    #[serde(alias = "mes")]
    Month,
}

/// Calendar bucket around a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerWindow {
    pub bucket: LedgerBucket,
    pub date: NaiveDate,
}

impl LedgerWindow {
    pub fn new(bucket: LedgerBucket, date: NaiveDate) -> Self {
        Self { bucket, date }
    }

    /// First and last calendar day covered, both inclusive
    pub fn days(&self) -> (NaiveDate, NaiveDate) {
        match self.bucket {
            LedgerBucket::Day => (self.date, self.date),
            LedgerBucket::Week => {
                let monday = self.date
                    - Duration::days(i64::from(self.date.weekday().num_days_from_monday()));
                (monday, monday + Duration::days(6))
            }
            LedgerBucket::Month => {
                let first = self.date.with_day(1).unwrap_or(self.date);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(first);
                (first, last)
            }
        }
    }

    /// Half-open `[start, end)` between local midnights in `tz`
    pub fn range(&self, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        let (first, last) = self.days();
        let end_day = last.succ_opt().unwrap_or(last);
        (local_midnight_utc(tz, first), local_midnight_utc(tz, end_day))
    }
}

/// Σ loans − Σ repayments
pub fn net_balance<'a>(entries: impl IntoIterator<Item = &'a LoanEntry>) -> Decimal {
    entries.into_iter().map(LoanEntry::signed_amount).sum()
}

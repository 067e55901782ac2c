use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::timezone::{parse_timestamp, BusinessClock};
use crate::core::{AppError, Result};

/// Reporting period a sale may fall into
///
/// Every comparison is made on the timestamp converted to the business
/// timezone. Weeks are ISO-8601 (Monday first, week 1 holds the first
/// Thursday) and are matched together with the ISO week-year, so the days
/// around January 1st that share a week share a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateWindow {
    Today,
    /// Zoned calendar date as `YYYY-MM-DD`, compared as text
    SpecificDay(String),
    SpecificWeek { week: u32, year: Option<i32> },
    SpecificMonth { month: u32, year: Option<i32> },
    CurrentWeek,
    CurrentMonth,
}

impl DateWindow {
    pub fn contains(&self, ts: DateTime<Utc>, clock: &BusinessClock) -> bool {
        let local = clock.local(ts).date_naive();
        let today = clock.today();

        match self {
            DateWindow::Today => local == today,
            DateWindow::SpecificDay(day) => local.format("%Y-%m-%d").to_string() == *day,
            DateWindow::SpecificWeek { week, year } => {
                let iso = local.iso_week();
                iso.week() == *week && iso.year() == year.unwrap_or(today.iso_week().year())
            }
            DateWindow::SpecificMonth { month, year } => {
                local.month() == *month && local.year() == year.unwrap_or(today.year())
            }
            DateWindow::CurrentWeek => local.iso_week() == today.iso_week(),
            DateWindow::CurrentMonth => {
                local.month() == today.month() && local.year() == today.year()
            }
        }
    }

    /// Like [`DateWindow::contains`] for a raw timestamp; unparseable input never matches
    pub fn contains_str(&self, raw: &str, clock: &BusinessClock) -> bool {
        parse_timestamp(raw).is_some_and(|ts| self.contains(ts, clock))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Today,
    SpecificDay,
    SpecificWeek,
    SpecificMonth,
    CurrentWeek,
    CurrentMonth,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Today => "today",
            FilterKind::SpecificDay => "specific_day",
            FilterKind::SpecificWeek => "specific_week",
            FilterKind::SpecificMonth => "specific_month",
            FilterKind::CurrentWeek => "current_week",
            FilterKind::CurrentMonth => "current_month",
        }
    }
}

/// Wire form of a sales filter, shared by the JSON body and the query string
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesFilterRequest {
    pub filter_type: FilterKind,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl SalesFilterRequest {
    /// Build the window, requiring the field each filter kind depends on
    pub fn window(&self) -> Result<DateWindow> {
        match self.filter_type {
            FilterKind::Today => Ok(DateWindow::Today),
            FilterKind::CurrentWeek => Ok(DateWindow::CurrentWeek),
            FilterKind::CurrentMonth => Ok(DateWindow::CurrentMonth),
            FilterKind::SpecificDay => {
                let day = self
                    .day
                    .as_deref()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .ok_or_else(|| AppError::validation("day is required for specific_day"))?;
                Ok(DateWindow::SpecificDay(day.to_string()))
            }
            FilterKind::SpecificWeek => {
                let week = self
                    .week
                    .ok_or_else(|| AppError::validation("week is required for specific_week"))?;
                if !(1..=53).contains(&week) {
                    return Err(AppError::validation("week must be between 1 and 53"));
                }
                Ok(DateWindow::SpecificWeek {
                    week,
                    year: self.year,
                })
            }
            FilterKind::SpecificMonth => {
                let month = self
                    .month
                    .ok_or_else(|| AppError::validation("month is required for specific_month"))?;
                if !(1..=12).contains(&month) {
                    return Err(AppError::validation("month must be between 1 and 12"));
                }
                Ok(DateWindow::SpecificMonth {
                    month,
                    year: self.year,
                })
            }
        }
    }
}

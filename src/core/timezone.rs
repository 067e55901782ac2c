use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::{AppError, Result};

/// Business-timezone view of "now"
///
/// All timestamps are stored as UTC; every calendar decision (which day,
/// week or month a sale belongs to) is taken in the salon's own timezone.
/// `now` is captured once so one request classifies every row against the
/// same instant.
#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    tz: Tz,
    now: DateTime<Utc>,
}

impl BusinessClock {
    /// Clock pinned to the current instant
    pub fn new(tz: Tz) -> Self {
        Self { tz, now: Utc::now() }
    }

    /// Clock pinned to an arbitrary instant
    pub fn at(tz: Tz, now: DateTime<Utc>) -> Self {
        Self { tz, now }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Convert a UTC instant into the business timezone
    pub fn local(&self, ts: DateTime<Utc>) -> DateTime<Tz> {
        ts.with_timezone(&self.tz)
    }

    /// Today's calendar date in the business timezone
    pub fn today(&self) -> NaiveDate {
        self.local(self.now).date_naive()
    }
}

/// UTC instant of local midnight on `date` in `tz`
///
/// When midnight falls in a DST gap the first valid instant of the day is used.
pub fn local_midnight_utc(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => {
            let shifted = midnight + Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
        }
    }
}

/// Parse a timezone name such as `America/Bogota`
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| AppError::Configuration(format!("Unknown timezone: {}", name)))
}

/// Parse a stored or client-supplied timestamp
///
/// Accepts RFC 3339 (`2024-03-10T23:59:59-05:00`) and naive
/// `YYYY-MM-DD[T ]HH:MM:SS[.f]`, which is read as UTC. Anything else yields
/// `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

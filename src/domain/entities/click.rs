//! Click analytics entities.

use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, FormField};
use crate::utils::datetime::{iso_instant, parse_click_timestamp};

/// A single recorded click on a short link.
///
/// `click_date` is a wall-clock timestamp. The backend sends it without an
/// offset; timestamps that do carry one are converted to the local calendar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    #[serde(deserialize_with = "deserialize_click_date")]
    pub click_date: NaiveDateTime,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub referer: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub browser: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
}

impl ClickEvent {
    /// Creates a click event carrying only a timestamp.
    pub fn at(click_date: NaiveDateTime) -> Self {
        Self {
            click_date,
            id: None,
            referer: None,
            country: None,
            browser: None,
            device_type: None,
        }
    }

    /// Calendar day the click belongs to.
    pub fn day(&self) -> NaiveDate {
        self.click_date.date()
    }
}

fn deserialize_click_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_click_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid click timestamp: {raw}")))
}

/// Click count for one calendar day.
///
/// Derived, never persisted. A missing `count` deserializes as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyClickBucket {
    pub click_date: NaiveDate,
    #[serde(default)]
    pub count: u64,
}

impl DailyClickBucket {
    pub fn new(click_date: NaiveDate, count: u64) -> Self {
        Self { click_date, count }
    }
}

/// Inclusive range of calendar days used by the total-clicks query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::validation(
                FormField::DateRange,
                format!("Start date {start} is after end date {end}"),
            ));
        }
        Ok(Self { start, end })
    }

    /// One calendar year back from `today`, through `today`.
    ///
    /// Feb 29 maps to Feb 28 of the previous year.
    pub fn trailing_year(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_months(Months::new(12))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `(startDate, endDate)` as `YYYY-MM-DD` query values.
    pub fn query_params(&self) -> (String, String) {
        (
            self.start.format("%Y-%m-%d").to_string(),
            self.end.format("%Y-%m-%d").to_string(),
        )
    }
}

/// Absolute time window used by the per-link analytics query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstantRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl InstantRange {
    /// The `days` days leading up to `now`.
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            start: now - Duration::days(days),
            end: now,
        }
    }

    /// `(startDate, endDate)` as ISO instants, e.g. `2025-01-01T00:00:00.000Z`.
    pub fn query_params(&self) -> (String, String) {
        (iso_instant(self.start), iso_instant(self.end))
    }
}

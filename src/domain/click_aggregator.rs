//! Turns raw click data into per-day count series.
//!
//! Two sources feed the charts:
//!
//! 1. Per-link analytics: a list of [`ClickEvent`]s, grouped here by
//!    [`aggregate`].
//! 2. Dashboard totals: a `day -> count` map computed by the backend,
//!    converted by [`series_from_daily_map`].
//!
//! Both series are sparse: days without clicks have no bucket.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::entities::{ClickEvent, DailyClickBucket};

/// Groups click events by calendar day.
///
/// Produces exactly one bucket per distinct day in `events`, with `count`
/// equal to the number of events on that day. Empty input yields an empty
/// vector. The order of the returned buckets is unspecified; callers that
/// display the series sort it first (see [`crate::domain::chart::ChartData`]).
pub fn aggregate(events: &[ClickEvent]) -> Vec<DailyClickBucket> {
    let mut per_day: HashMap<NaiveDate, u64> = HashMap::new();

    for event in events {
        *per_day.entry(event.day()).or_insert(0) += 1;
    }

    per_day
        .into_iter()
        .map(|(click_date, count)| DailyClickBucket::new(click_date, count))
        .collect()
}

/// Converts the backend's `YYYY-MM-DD -> count` map into a series sorted
/// ascending by date.
///
/// Null counts become zero. Keys that are not calendar days are dropped.
pub fn series_from_daily_map(map: HashMap<String, Option<u64>>) -> Vec<DailyClickBucket> {
    let mut series: Vec<DailyClickBucket> = map
        .into_iter()
        .filter_map(|(key, count)| match NaiveDate::parse_from_str(&key, "%Y-%m-%d") {
            Ok(click_date) => Some(DailyClickBucket::new(click_date, count.unwrap_or(0))),
            Err(e) => {
                warn!(key = %key, error = %e, "Dropping total-clicks entry with invalid date");
                None
            }
        })
        .collect();

    sort_by_day(&mut series);
    series
}

/// Sorts a series ascending by date.
pub fn sort_by_day(series: &mut [DailyClickBucket]) {
    series.sort_by_key(|bucket| bucket.click_date);
}

/// Sum of all bucket counts.
pub fn total_click_count(series: &[DailyClickBucket]) -> u64 {
    series.iter().map(|bucket| bucket.count).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use serde_json::json;

    fn click(ts: &str) -> ClickEvent {
        ClickEvent::at(NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S").unwrap())
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_aggregate_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_one_bucket_per_day() {
        let events = vec![
            click("2025-01-03T09:00:00"),
            click("2025-01-01T00:00:00"),
            click("2025-01-03T23:59:59"),
            click("2025-01-01T12:30:00"),
            click("2025-01-03T00:00:01"),
            click("2025-01-02T08:00:00"),
        ];

        let mut buckets = aggregate(&events);
        sort_by_day(&mut buckets);

        assert_eq!(
            buckets,
            vec![
                DailyClickBucket::new(day("2025-01-01"), 2),
                DailyClickBucket::new(day("2025-01-02"), 1),
                DailyClickBucket::new(day("2025-01-03"), 3),
            ]
        );
        assert_eq!(total_click_count(&buckets), events.len() as u64);
    }

    #[test]
    fn test_aggregate_does_not_synthesize_missing_days() {
        let events = vec![click("2025-01-01T10:00:00"), click("2025-01-10T10:00:00")];
        assert_eq!(aggregate(&events).len(), 2);
    }

    #[test]
    fn test_series_from_map_sorted_ascending() {
        let map: HashMap<String, Option<u64>> =
            serde_json::from_value(json!({ "2025-01-03": 2, "2025-01-01": 5 })).unwrap();

        assert_eq!(
            series_from_daily_map(map),
            vec![
                DailyClickBucket::new(day("2025-01-01"), 5),
                DailyClickBucket::new(day("2025-01-03"), 2),
            ]
        );
    }

    #[test]
    fn test_series_from_map_null_and_invalid_entries() {
        let map: HashMap<String, Option<u64>> = serde_json::from_value(json!({
            "2025-02-01": null,
            "not-a-date": 9,
            "2025-01-15": 1
        }))
        .unwrap();

        let series = series_from_daily_map(map);

        assert_eq!(
            series,
            vec![
                DailyClickBucket::new(day("2025-01-15"), 1),
                DailyClickBucket::new(day("2025-02-01"), 0),
            ]
        );
    }

    #[test]
    fn test_total_click_count_missing_count_is_zero() {
        let series: Vec<DailyClickBucket> = serde_json::from_value(json!([
            { "clickDate": "2025-01-01", "count": 4 },
            { "clickDate": "2025-01-02" }
        ]))
        .unwrap();

        assert_eq!(total_click_count(&series), 4);
    }

    #[test]
    fn test_total_click_count_empty() {
        assert_eq!(total_click_count(&[]), 0);
    }
}

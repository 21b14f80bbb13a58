//! Chart-ready representation of a click series.

use serde::Serialize;

use crate::domain::click_aggregator::sort_by_day;
use crate::domain::entities::DailyClickBucket;

/// One bar of the click chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    /// Axis label, e.g. `Jan 03`.
    pub label: String,
    pub count: u64,
}

/// What a chart renders.
///
/// An empty series is an explicit [`ChartData::NoData`] state, never an empty
/// chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "points", rename_all = "snake_case")]
pub enum ChartData {
    NoData,
    Series(Vec<ChartPoint>),
}

impl ChartData {
    /// Builds chart data from buckets in any order, sorting ascending by date.
    pub fn from_buckets(buckets: &[DailyClickBucket]) -> Self {
        if buckets.is_empty() {
            return Self::NoData;
        }

        let mut sorted = buckets.to_vec();
        sort_by_day(&mut sorted);

        Self::Series(
            sorted
                .into_iter()
                .map(|bucket| ChartPoint {
                    label: bucket.click_date.format("%b %d").to_string(),
                    count: bucket.count,
                })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoData)
    }

    /// Largest count in the series, zero for no data.
    pub fn max_count(&self) -> u64 {
        match self {
            Self::NoData => 0,
            Self::Series(points) => points.iter().map(|p| p.count).max().unwrap_or(0),
        }
    }
}

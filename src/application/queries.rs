//! Cacheable backend reads used by the dashboard.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::click_aggregator::series_from_daily_map;
use crate::domain::entities::{DailyClickBucket, DateRange, ShortLink, sort_newest_first};
use crate::domain::repositories::{LinkRepository, StatsRepository};
use crate::error::AppError;
use crate::infrastructure::cache::{Query, QueryKey};

/// Query name of the link list.
pub const LINKS_QUERY: &str = "my-shortenurls";

/// Query name of the total-clicks series.
pub const TOTAL_CLICKS_QUERY: &str = "url-totalclick";

/// All links of the signed-in user, newest first.
#[derive(Clone)]
pub struct LinksQuery {
    links: Arc<dyn LinkRepository>,
}

impl LinksQuery {
    pub fn new(links: Arc<dyn LinkRepository>) -> Self {
        Self { links }
    }
}

#[async_trait]
impl Query for LinksQuery {
    type Raw = Vec<ShortLink>;
    type Output = Vec<ShortLink>;

    fn key(&self) -> QueryKey {
        QueryKey::new(LINKS_QUERY)
    }

    async fn fetch(&self) -> Result<Vec<ShortLink>, AppError> {
        self.links.list_mine().await
    }

    fn select(&self, mut raw: Vec<ShortLink>) -> Vec<ShortLink> {
        sort_newest_first(&mut raw);
        raw
    }

    fn failure_message(&self) -> &'static str {
        "Failed to load your links."
    }
}

/// Clicks per day across all links, ascending by date.
#[derive(Clone)]
pub struct TotalClicksQuery {
    stats: Arc<dyn StatsRepository>,
    range: DateRange,
}

impl TotalClicksQuery {
    pub fn new(stats: Arc<dyn StatsRepository>, range: DateRange) -> Self {
        Self { stats, range }
    }
}

#[async_trait]
impl Query for TotalClicksQuery {
    type Raw = HashMap<String, Option<u64>>;
    type Output = Vec<DailyClickBucket>;

    fn key(&self) -> QueryKey {
        let (start, end) = self.range.query_params();
        QueryKey::new(TOTAL_CLICKS_QUERY).with(start).with(end)
    }

    async fn fetch(&self) -> Result<HashMap<String, Option<u64>>, AppError> {
        self.stats.total_clicks(self.range).await
    }

    fn select(&self, raw: HashMap<String, Option<u64>>) -> Vec<DailyClickBucket> {
        series_from_daily_map(raw)
    }

    fn failure_message(&self) -> &'static str {
        "Failed to load click statistics."
    }
}

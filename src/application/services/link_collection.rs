//! The signed-in user's links and click totals, read through the query cache.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use parking_lot::RwLock;
use tracing::debug;

use crate::application::queries::{LINKS_QUERY, LinksQuery, TOTAL_CLICKS_QUERY, TotalClicksQuery};
use crate::domain::chart::ChartData;
use crate::domain::click_aggregator::total_click_count;
use crate::domain::entities::{DailyClickBucket, DateRange, ShortLink};
use crate::domain::repositories::{LinkRepository, StatsRepository};
use crate::error::ErrorRouter;
use crate::infrastructure::cache::{Query, QueryCache, QueryState};

/// Read model of the dashboard.
///
/// Built from the cached query outputs on every read; the totals are never
/// stored on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Newest first.
    pub links: Vec<ShortLink>,
    /// Ascending by date.
    pub click_series: Vec<DailyClickBucket>,
    pub total_links: usize,
    pub total_click_count: u64,
}

impl DashboardSummary {
    pub fn new(links: Vec<ShortLink>, click_series: Vec<DailyClickBucket>) -> Self {
        Self {
            total_links: links.len(),
            total_click_count: total_click_count(&click_series),
            links,
            click_series,
        }
    }

    pub fn chart(&self) -> ChartData {
        ChartData::from_buckets(&self.click_series)
    }

    pub fn find(&self, short_url: &str) -> Option<&ShortLink> {
        self.links.iter().find(|link| link.short_url == short_url)
    }
}

/// Single reader and writer of the link list and the total-clicks series.
pub struct LinkCollection {
    links_query: LinksQuery,
    stats: Arc<dyn StatsRepository>,
    links: QueryCache<Vec<ShortLink>>,
    clicks: QueryCache<Vec<DailyClickBucket>>,
    range: RwLock<DateRange>,
}

impl LinkCollection {
    /// Creates the collection with the default range: one year back through today.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        stats: Arc<dyn StatsRepository>,
        stale_time: Duration,
        router: ErrorRouter,
    ) -> Self {
        Self {
            links_query: LinksQuery::new(links),
            stats,
            links: QueryCache::new(stale_time, router.clone()),
            clicks: QueryCache::new(stale_time, router),
            range: RwLock::new(DateRange::trailing_year(Local::now().date_naive())),
        }
    }

    pub fn with_range(self, range: DateRange) -> Self {
        *self.range.write() = range;
        self
    }

    pub fn range(&self) -> DateRange {
        *self.range.read()
    }

    /// Switches the click series to `range`. Each range is cached under its own key.
    pub fn set_range(&self, range: DateRange) {
        debug!(start = %range.start(), end = %range.end(), "Click range changed");
        *self.range.write() = range;
    }

    fn clicks_query(&self) -> TotalClicksQuery {
        TotalClicksQuery::new(Arc::clone(&self.stats), self.range())
    }

    /// Combined state of both queries, without fetching.
    ///
    /// `Loading` while either query has nothing to show yet, `Failed` if either
    /// failed without cached data, otherwise `Ready`.
    pub fn state(&self) -> QueryState<DashboardSummary> {
        let links = self.links.state(&self.links_query.key());
        let clicks = self.clicks.state(&self.clicks_query().key());

        match (links, clicks) {
            (QueryState::Loading, _) | (_, QueryState::Loading) => QueryState::Loading,
            (QueryState::Failed(error), _) | (_, QueryState::Failed(error)) => {
                QueryState::Failed(error)
            }
            (QueryState::Ready(links), QueryState::Ready(series)) => {
                QueryState::Ready(DashboardSummary::new(links, series))
            }
        }
    }

    /// Reads both queries through the cache and returns the combined state.
    ///
    /// Failures have already been routed when this returns.
    pub async fn load(&self) -> QueryState<DashboardSummary> {
        let clicks_query = self.clicks_query();
        let _ = tokio::join!(
            self.links.fetch(&self.links_query),
            self.clicks.fetch(&clicks_query)
        );
        self.state()
    }

    /// Marks both queries invalid; the next read waits for fresh data.
    pub fn invalidate(&self) {
        self.links.invalidate(LINKS_QUERY);
        self.clicks.invalidate(TOTAL_CLICKS_QUERY);
    }

    /// Fetches both queries regardless of freshness.
    pub async fn refetch(&self) -> QueryState<DashboardSummary> {
        let clicks_query = self.clicks_query();
        let _ = tokio::join!(
            self.links.refetch(&self.links_query),
            self.clicks.refetch(&clicks_query)
        );
        self.state()
    }

    /// Drops all cached data, e.g. after the session changes.
    pub fn clear(&self) {
        self.links.clear();
        self.clicks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::effects::MockNotifier;
    use crate::domain::repositories::{MockLinkRepository, MockStatsRepository};
    use crate::error::AppError;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn link(id: i64, token: &str, created: NaiveDate) -> ShortLink {
        ShortLink::new(
            id,
            token.to_string(),
            "https://example.com".to_string(),
            0,
            created.and_hms_opt(12, 0, 0).unwrap(),
        )
    }

    fn router(expected_errors: usize) -> ErrorRouter {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .times(expected_errors)
            .return_const(());
        ErrorRouter::new(Arc::new(notifier), Arc::new(|_: u16| {}))
    }

    fn stats_with(map: HashMap<String, Option<u64>>) -> MockStatsRepository {
        let mut stats = MockStatsRepository::new();
        stats
            .expect_total_clicks()
            .returning(move |_| Ok(map.clone()));
        stats
    }

    #[tokio::test]
    async fn test_summary_derives_totals() {
        let mut links = MockLinkRepository::new();
        links.expect_list_mine().times(1).returning(|| {
            Ok(vec![
                link(1, "a", day(2025, 1, 1)),
                link(2, "b", day(2025, 3, 1)),
            ])
        });
        let stats = stats_with(HashMap::from([
            ("2025-03-02".to_string(), Some(4)),
            ("2025-03-01".to_string(), None),
            ("2025-01-02".to_string(), Some(1)),
        ]));

        let collection = LinkCollection::new(
            Arc::new(links),
            Arc::new(stats),
            Duration::from_secs(5),
            router(0),
        );

        assert!(collection.state().is_loading());

        let QueryState::Ready(summary) = collection.load().await else {
            panic!("expected ready state");
        };

        assert_eq!(summary.total_links, 2);
        assert_eq!(summary.total_click_count, 5);
        assert_eq!(summary.links[0].short_url, "b");
        assert_eq!(summary.click_series[0].click_date, day(2025, 1, 2));
        assert!(summary.find("a").is_some());
    }

    #[tokio::test]
    async fn test_empty_collection_is_ready_not_failed() {
        let mut links = MockLinkRepository::new();
        links.expect_list_mine().returning(|| Ok(vec![]));

        let collection = LinkCollection::new(
            Arc::new(links),
            Arc::new(stats_with(HashMap::new())),
            Duration::from_secs(5),
            router(0),
        );

        let QueryState::Ready(summary) = collection.load().await else {
            panic!("expected ready state");
        };
        assert_eq!(summary.total_links, 0);
        assert_eq!(summary.total_click_count, 0);
        assert_eq!(summary.chart(), ChartData::NoData);
    }

    #[tokio::test]
    async fn test_failure_in_either_query_fails_combined_state() {
        let mut links = MockLinkRepository::new();
        links.expect_list_mine().returning(|| Ok(vec![]));
        let mut stats = MockStatsRepository::new();
        stats
            .expect_total_clicks()
            .returning(|_| Err(AppError::remote(Some(500), None, "HTTP 500")));

        let collection = LinkCollection::new(
            Arc::new(links),
            Arc::new(stats),
            Duration::from_secs(5),
            router(1),
        );

        assert!(matches!(collection.load().await, QueryState::Failed(_)));
    }

    #[tokio::test]
    async fn test_range_is_part_of_click_key() {
        let mut links = MockLinkRepository::new();
        links.expect_list_mine().times(1).returning(|| Ok(vec![]));
        let mut stats = MockStatsRepository::new();
        stats
            .expect_total_clicks()
            .times(2)
            .returning(|_| Ok(HashMap::new()));

        let collection = LinkCollection::new(
            Arc::new(links),
            Arc::new(stats),
            Duration::from_secs(5),
            router(0),
        )
        .with_range(DateRange::new(day(2025, 1, 1), day(2025, 1, 31)).unwrap());

        collection.load().await;
        collection.set_range(DateRange::new(day(2025, 2, 1), day(2025, 2, 28)).unwrap());
        collection.load().await;

        assert_eq!(collection.range().start(), day(2025, 2, 1));
    }

    #[tokio::test]
    async fn test_invalidate_forces_both_queries() {
        let mut links = MockLinkRepository::new();
        links.expect_list_mine().times(2).returning(|| Ok(vec![]));
        let mut stats = MockStatsRepository::new();
        stats
            .expect_total_clicks()
            .times(2)
            .returning(|_| Ok(HashMap::new()));

        let collection = LinkCollection::new(
            Arc::new(links),
            Arc::new(stats),
            Duration::from_secs(5),
            router(0),
        );

        collection.load().await;
        collection.load().await;
        collection.invalidate();
        collection.load().await;
    }
}

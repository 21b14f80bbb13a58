//! Expandable per-link analytics.
//!
//! Each link view owns one [`AnalyticsPanel`]; panels never share data. The
//! fetch runs as a detached task holding only a weak reference to the panel,
//! so a response that arrives after the panel was dropped is discarded.

use std::sync::{Arc, Weak};

use chrono::Utc;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::chart::ChartData;
use crate::domain::click_aggregator::{aggregate, total_click_count};
use crate::domain::entities::{ClickEvent, DailyClickBucket, InstantRange};
use crate::domain::repositories::StatsRepository;
use crate::error::{AppError, ErrorRouter};
use crate::infrastructure::cache::QueryState;

pub const ANALYTICS_FAILED_MESSAGE: &str = "Failed to load analytics data.";

/// Days of history shown in a panel.
pub const ANALYTICS_WINDOW_DAYS: i64 = 30;

#[derive(Default)]
struct PanelState {
    expanded: bool,
    loading: bool,
    events: Option<Vec<ClickEvent>>,
    series: Vec<DailyClickBucket>,
    error: Option<AppError>,
}

pub struct AnalyticsPanel {
    short_url: String,
    stats: Arc<dyn StatsRepository>,
    router: ErrorRouter,
    state: Mutex<PanelState>,
}

impl AnalyticsPanel {
    pub fn new(
        short_url: impl Into<String>,
        stats: Arc<dyn StatsRepository>,
        router: ErrorRouter,
    ) -> Arc<Self> {
        Arc::new(Self {
            short_url: short_url.into(),
            stats,
            router,
            state: Mutex::new(PanelState::default()),
        })
    }

    pub fn short_url(&self) -> &str {
        &self.short_url
    }

    /// Opens or closes the panel.
    ///
    /// Opening a panel that has no data yet starts a load and returns its
    /// handle. Closing keeps the loaded data for the next open.
    pub fn toggle(self: &Arc<Self>) -> Option<JoinHandle<bool>> {
        let needs_load = {
            let mut state = self.state.lock();
            let needs_load = !state.expanded && state.events.is_none() && !state.loading;
            state.expanded = !state.expanded;
            needs_load
        };

        needs_load.then(|| self.spawn_load())
    }

    /// Fetches the last 30 days of clicks in the background.
    ///
    /// The handle resolves to `true` if the result was applied to the panel and
    /// `false` if the panel was gone by the time it arrived.
    pub fn spawn_load(self: &Arc<Self>) -> JoinHandle<bool> {
        {
            let mut state = self.state.lock();
            state.loading = true;
            state.events = None;
            state.series.clear();
            state.error = None;
        }

        let panel: Weak<Self> = Arc::downgrade(self);
        let stats = Arc::clone(&self.stats);
        let short_url = self.short_url.clone();
        let range = InstantRange::trailing_days(Utc::now(), ANALYTICS_WINDOW_DAYS);

        tokio::spawn(async move {
            let result = stats.link_analytics(&short_url, range).await;

            match panel.upgrade() {
                Some(panel) => {
                    panel.apply(result);
                    true
                }
                None => {
                    debug!(short_url = %short_url, "Analytics arrived after panel was closed; discarded");
                    false
                }
            }
        })
    }

    fn apply(&self, result: Result<Vec<ClickEvent>, AppError>) {
        let failed = {
            let mut state = self.state.lock();
            state.loading = false;
            match result {
                Ok(events) => {
                    debug!(short_url = %self.short_url, events = events.len(), "Analytics loaded");
                    state.series = aggregate(&events);
                    state.events = Some(events);
                    None
                }
                Err(e) => {
                    state.error = Some(e.clone());
                    Some(e)
                }
            }
        };

        if let Some(e) = failed {
            self.router.route(&e, ANALYTICS_FAILED_MESSAGE);
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.state.lock().expanded
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Aggregated series in aggregation order (unsorted).
    pub fn series(&self) -> Vec<DailyClickBucket> {
        self.state.lock().series.clone()
    }

    /// Number of raw click events loaded.
    pub fn total_clicks(&self) -> u64 {
        total_click_count(&self.state.lock().series)
    }

    /// What the panel shows: a chart once loaded.
    pub fn view(&self) -> QueryState<ChartData> {
        let state = self.state.lock();
        if state.loading {
            return QueryState::Loading;
        }
        match (&state.events, &state.error) {
            (Some(_), _) => QueryState::Ready(ChartData::from_buckets(&state.series)),
            (None, Some(e)) => QueryState::Failed(e.clone()),
            (None, None) => QueryState::Loading,
        }
    }
}

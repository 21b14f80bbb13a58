//! Repository trait for click statistics.

use std::collections::HashMap;

use crate::domain::entities::{ClickEvent, DateRange, InstantRange};
use crate::error::AppError;
use async_trait::async_trait;

/// Raw click data as computed by the backend.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::HttpStatsRepository`] - REST implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Clicks across all of the user's links, keyed by `YYYY-MM-DD`.
    ///
    /// Counts may be `null`; callers treat that as zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] or [`AppError::Remote`].
    async fn total_clicks(&self, range: DateRange)
    -> Result<HashMap<String, Option<u64>>, AppError>;

    /// Individual click events for one link inside `range`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] or [`AppError::Remote`].
    async fn link_analytics(
        &self,
        short_url: &str,
        range: InstantRange,
    ) -> Result<Vec<ClickEvent>, AppError>;
}

//! REST implementation of [`StatsRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::domain::entities::{ClickEvent, DateRange, InstantRange};
use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Click endpoints under `/api/urls`.
#[derive(Clone)]
pub struct HttpStatsRepository {
    client: ApiClient,
}

impl HttpStatsRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatsRepository for HttpStatsRepository {
    async fn total_clicks(
        &self,
        range: DateRange,
    ) -> Result<HashMap<String, Option<u64>>, AppError> {
        let (start, end) = range.query_params();
        let builder = self
            .client
            .request(Method::GET, &["api", "urls", "totalClicks"])
            .query(&[("startDate", start), ("endDate", end)]);
        self.client.send_json(builder).await
    }

    async fn link_analytics(
        &self,
        short_url: &str,
        range: InstantRange,
    ) -> Result<Vec<ClickEvent>, AppError> {
        let (start, end) = range.query_params();
        let builder = self
            .client
            .request(Method::GET, &["api", "urls", "analytics", short_url])
            .query(&[("startDate", start), ("endDate", end)]);
        self.client.send_json(builder).await
    }
}

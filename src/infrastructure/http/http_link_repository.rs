//! REST implementation of [`LinkRepository`].

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::domain::entities::{CreateLinkRequest, LinkPatch, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link endpoints under `/api/urls`.
#[derive(Clone)]
pub struct HttpLinkRepository {
    client: ApiClient,
}

impl HttpLinkRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkRepository for HttpLinkRepository {
    async fn create(&self, request: CreateLinkRequest) -> Result<ShortLink, AppError> {
        let builder = self
            .client
            .request(Method::POST, &["api", "urls", "shorten"])
            .json(&request);
        self.client.send_json(builder).await
    }

    async fn list_mine(&self) -> Result<Vec<ShortLink>, AppError> {
        let builder = self.client.request(Method::GET, &["api", "urls", "myurls"]);
        self.client.send_json(builder).await
    }

    async fn details(&self, short_url: &str) -> Result<ShortLink, AppError> {
        let builder = self.client.request(Method::GET, &["api", "urls", short_url]);
        self.client.send_json(builder).await
    }

    async fn update(&self, short_url: &str, patch: LinkPatch) -> Result<ShortLink, AppError> {
        let builder = self
            .client
            .request(Method::PUT, &["api", "urls", short_url])
            .json(&patch);
        self.client.send_json(builder).await
    }

    async fn delete(&self, short_url: &str) -> Result<(), AppError> {
        let builder = self.client.request(Method::DELETE, &["api", "urls", short_url]);
        self.client.send_empty(builder).await
    }
}

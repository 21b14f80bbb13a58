//! REST implementation of [`AuthRepository`].

use async_trait::async_trait;
use reqwest::Method;

use super::ApiClient;
use crate::domain::entities::{LoginRequest, LoginResponse, RegisterRequest};
use crate::domain::repositories::AuthRepository;
use crate::error::AppError;

/// Public endpoints under `/api/auth/public`. Requests carry no bearer token.
#[derive(Clone)]
pub struct HttpAuthRepository {
    client: ApiClient,
}

impl HttpAuthRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthRepository for HttpAuthRepository {
    async fn login(&self, request: LoginRequest) -> Result<String, AppError> {
        let builder = self
            .client
            .public_request(Method::POST, &["api", "auth", "public", "login"])
            .json(&request);
        let response: LoginResponse = self.client.send_json(builder).await?;
        Ok(response.token)
    }

    async fn register(&self, request: RegisterRequest) -> Result<(), AppError> {
        let builder = self
            .client
            .public_request(Method::POST, &["api", "auth", "public", "register"])
            .json(&request);
        self.client.send_empty(builder).await
    }
}

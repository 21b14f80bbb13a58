//! Shared HTTP plumbing for the backend repositories.
//!
//! Owns the `reqwest::Client`, builds endpoint URLs under the configured
//! backend origin, attaches the session's bearer token and maps responses
//! onto [`AppError`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::entities::Session;
use crate::error::AppError;

/// Error body shape used by the backend: `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Authenticated client for the shortener REST API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    /// Creates a client for `base_url` (an origin, optionally with a path prefix).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Remote`] if `base_url` does not parse or the
    /// underlying HTTP client cannot be built.
    pub fn new(base_url: &str, session: Arc<Session>, timeout: Duration) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::remote(None, None, format!("invalid backend URL: {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("shortify/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::remote(None, None, format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Builds `{base}/{segments...}`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Request carrying the session's bearer token, when there is one.
    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.public_request(method, segments);
        match self.session.bearer() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Request without credentials, for the public auth endpoints.
    pub fn public_request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.endpoint(segments))
    }

    /// Sends `request` and decodes a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for 401/403, [`AppError::Remote`] for
    /// other failures, including transport and decoding errors.
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = self.send(request).await?;
        let status = response.status();

        response.json::<T>().await.map_err(|e| {
            AppError::remote(
                Some(status.as_u16()),
                None,
                format!("invalid response body: {e}"),
            )
        })
    }

    /// Sends `request` and ignores the body.
    ///
    /// # Errors
    ///
    /// See [`Self::send_json`].
    pub async fn send_empty(&self, request: RequestBuilder) -> Result<(), AppError> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Backend responded");

        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(error_from_status(status, &body, &url))
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    let detail = if e.is_timeout() {
        format!("request timed out: {e}")
    } else {
        format!("request failed: {e}")
    };
    AppError::remote(e.status().map(|s| s.as_u16()), None, detail)
}

/// Maps a non-success response onto the error taxonomy.
pub(crate) fn error_from_status(status: StatusCode, body: &str, url: &str) -> AppError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return AppError::unauthorized(status.as_u16());
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    AppError::remote(
        Some(status.as_u16()),
        message,
        format!("HTTP {} from {}", status.as_u16(), url),
    )
}

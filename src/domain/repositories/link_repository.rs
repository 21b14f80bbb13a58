//! Repository trait for the signed-in user's short links.

use crate::domain::entities::{CreateLinkRequest, LinkPatch, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Remote link operations, scoped to the current session.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::HttpLinkRepository`] - REST implementation
/// - Test mocks available with `cfg(test)`
///
/// # Errors
///
/// Every method returns [`AppError::Unauthorized`] when the backend rejects the
/// session and [`AppError::Remote`] for any other failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a short link. The server assigns the token unless a custom
    /// alias is given.
    async fn create(&self, request: CreateLinkRequest) -> Result<ShortLink, AppError>;

    /// Lists every link owned by the current user, in server order.
    async fn list_mine(&self) -> Result<Vec<ShortLink>, AppError>;

    /// Fetches a single link by token.
    async fn details(&self, short_url: &str) -> Result<ShortLink, AppError>;

    /// Applies a partial update and returns the updated link.
    async fn update(&self, short_url: &str, patch: LinkPatch) -> Result<ShortLink, AppError>;

    /// Deletes a link by token.
    async fn delete(&self, short_url: &str) -> Result<(), AppError>;
}

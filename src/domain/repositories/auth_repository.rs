//! Repository trait for the public authentication endpoints.

use crate::domain::entities::{LoginRequest, RegisterRequest};
use crate::error::AppError;
use async_trait::async_trait;

/// Login and registration. Neither call needs a session.
///
/// # Implementations
///
/// - [`crate::infrastructure::http::HttpAuthRepository`] - REST implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Exchanges credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] or [`AppError::Remote`] for rejected
    /// credentials, depending on the status the backend picks.
    async fn login(&self, request: LoginRequest) -> Result<String, AppError>;

    /// Creates an account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Remote`] if the backend refuses the registration.
    async fn register(&self, request: RegisterRequest) -> Result<(), AppError>;
}

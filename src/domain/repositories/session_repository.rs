//! Repository trait for persisting the session token between runs.

use crate::error::AppError;

/// Durable storage for the bearer token.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::FileSessionRepository`] - plain file
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait SessionRepository: Send + Sync {
    /// Returns the stored token, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store exists but cannot be read.
    fn load(&self) -> Result<Option<String>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on write failure.
    fn save(&self, token: &str) -> Result<(), AppError>;

    /// Removes the stored token. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on delete failure.
    fn clear(&self) -> Result<(), AppError>;
}

//! Boundaries to the presentation layer.
//!
//! Notifications, clipboard access and navigation are owned by whatever front
//! end drives the core (the `shortify` binary uses the terminal). The core only
//! talks to these traits.

use std::sync::Arc;

use crate::error::AppError;

/// Called with the HTTP status (401 or 403) when an authenticated call is rejected.
pub type AuthFailureHandler = Arc<dyn Fn(u16) + Send + Sync>;

/// Transient user-facing notifications (toasts).
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// System clipboard.
#[cfg_attr(test, mockall::automock)]
pub trait Clipboard: Send + Sync {
    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the clipboard is unavailable.
    fn copy(&self, text: &str) -> Result<(), AppError>;
}

/// Full (non client-side) navigation to an absolute address.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

//! Error taxonomy and error routing.
//!
//! Every fallible operation in the crate returns [`AppError`]. How an error is
//! presented is decided in one place, [`ErrorRouter`]: authentication failures
//! go to the caller-supplied auth-failure callback, everything else becomes a
//! transient notification.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::domain::effects::{AuthFailureHandler, Notifier};

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    OriginalUrl,
    CustomAlias,
    ExpiresAt,
    Password,
    DateRange,
    Username,
    Email,
}

impl FormField {
    /// Wire name of the field, as used in request payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OriginalUrl => "originalUrl",
            Self::CustomAlias => "customAlias",
            Self::ExpiresAt => "expiresAt",
            Self::Password => "password",
            Self::DateRange => "dateRange",
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// Client-side, field-scoped. Never reaches the network layer.
    #[error("{field}: {message}")]
    Validation { field: FormField, message: String },

    /// 401/403 from any authenticated call.
    #[error("not authorized (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Any other failed remote call, including transport and decoding errors.
    ///
    /// `message` is the server-provided message, if the response carried one.
    #[error("remote call failed: {detail}")]
    Remote {
        status: Option<u16>,
        message: Option<String>,
        detail: String,
    },

    /// Session file could not be read or written.
    #[error("session storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn validation(field: FormField, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn unauthorized(status: u16) -> Self {
        Self::Unauthorized { status }
    }

    pub fn remote(status: Option<u16>, message: Option<String>, detail: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message,
            detail: detail.into(),
        }
    }

    pub fn storage(detail: impl Into<String>) -> Self {
        Self::Storage(detail.into())
    }

    /// Converts `validator` errors into the first failing field, checked in
    /// `order` (struct field name, form field).
    pub(crate) fn from_validation(
        errors: &validator::ValidationErrors,
        order: &[(&str, FormField)],
    ) -> Self {
        let field_errors = errors.field_errors();

        for (name, field) in order {
            if let Some(first) = field_errors.get(*name).and_then(|errs| errs.first()) {
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                return Self::validation(*field, message);
            }
        }

        let fallback = order.first().map_or(FormField::OriginalUrl, |(_, f)| *f);
        Self::validation(fallback, errors.to_string())
    }

    /// Returns true for 401/403 responses.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Field that failed validation, if this is a validation error.
    pub fn field(&self) -> Option<FormField> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }

    /// Server-provided message of a remote error. Blank messages count as absent.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Remote {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// Text to show the user: the server message when there is one, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

/// Routes failed calls to the auth-failure path or to a notification.
///
/// Auth errors short-circuit to the callback and never produce a notification.
#[derive(Clone)]
pub struct ErrorRouter {
    notifier: Arc<dyn Notifier>,
    on_auth_failure: AuthFailureHandler,
}

impl ErrorRouter {
    pub fn new(notifier: Arc<dyn Notifier>, on_auth_failure: AuthFailureHandler) -> Self {
        Self {
            notifier,
            on_auth_failure,
        }
    }

    /// Presents `error`, using `fallback` when the server gave no message.
    pub fn route(&self, error: &AppError, fallback: &str) {
        match error {
            AppError::Unauthorized { status } => {
                warn!(status, "Authentication failure, routing to auth handler");
                (self.on_auth_failure)(*status);
            }
            other => {
                warn!(error = %other, "Remote operation failed");
                self.notifier.error(&other.user_message(fallback));
            }
        }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::effects::MockNotifier;
    use std::sync::atomic::{AtomicU16, Ordering};

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = AppError::remote(Some(409), Some("Alias taken".to_string()), "conflict");
        assert_eq!(err.user_message("fallback"), "Alias taken");
    }

    #[test]
    fn test_user_message_falls_back_on_blank_message() {
        let err = AppError::remote(Some(500), Some("  ".to_string()), "boom");
        assert_eq!(err.user_message("fallback"), "fallback");

        let err = AppError::remote(None, None, "connection refused");
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn test_validation_error_exposes_field() {
        let err = AppError::validation(FormField::Password, "too short");
        assert_eq!(err.field(), Some(FormField::Password));
        assert_eq!(err.to_string(), "password: too short");
        assert!(!err.is_auth());
    }

    #[test]
    fn test_route_unauthorized_skips_notification() {
        let mut notifier = MockNotifier::new();
        notifier.expect_error().times(0);
        notifier.expect_success().times(0);

        let seen = Arc::new(AtomicU16::new(0));
        let seen_clone = seen.clone();
        let router = ErrorRouter::new(
            Arc::new(notifier),
            Arc::new(move |status: u16| seen_clone.store(status, Ordering::SeqCst)),
        );

        router.route(&AppError::unauthorized(401), "Failed");

        assert_eq!(seen.load(Ordering::SeqCst), 401);
    }

    #[test]
    fn test_route_remote_error_notifies() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .withf(|msg| msg == "Failed to load")
            .times(1)
            .return_const(());

        let router = ErrorRouter::new(
            Arc::new(notifier),
            Arc::new(|_: u16| panic!("auth handler must not run")),
        );

        router.route(&AppError::remote(Some(500), None, "500"), "Failed to load");
    }
}

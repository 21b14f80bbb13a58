//! Authenticated session state.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, FormField};

/// Credentials for `POST /api/auth/public/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

impl LoginRequest {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for the first empty field.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|errors| {
            AppError::from_validation(
                &errors,
                &[
                    ("username", FormField::Username),
                    ("password", FormField::Password),
                ],
            )
        })
    }
}

/// Payload of `POST /api/auth/public/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "A unique username is required."))]
    pub username: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

impl RegisterRequest {
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for the first invalid field, in form order.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|errors| {
            AppError::from_validation(
                &errors,
                &[
                    ("username", FormField::Username),
                    ("email", FormField::Email),
                    ("password", FormField::Password),
                ],
            )
        })
    }
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// The bearer token of the signed-in user, if any.
///
/// Read by every authenticated request. Only the auth service writes it.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.filter(|t| !t.is_empty())),
        }
    }

    /// Current token, cloned.
    pub fn bearer(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    pub(crate) fn set(&self, token: String) {
        *self.token.write() = Some(token);
    }

    pub(crate) fn clear(&self) {
        *self.token.write() = None;
    }
}

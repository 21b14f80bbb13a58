//! Session lifecycle: restore at startup, login, registration and logout.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::effects::Notifier;
use crate::domain::entities::{LoginRequest, RegisterRequest, Session};
use crate::domain::repositories::{AuthRepository, SessionRepository};
use crate::error::AppError;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Welcome back! Login Successful.";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Registration Successful! Please log in.";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

/// The only writer of the [`Session`].
///
/// Keeps the in-memory session and the persisted token in step. Login and
/// registration failures are shown as notifications even for 401 responses:
/// on these endpoints a rejection means bad credentials, not an expired session.
pub struct AuthService {
    auth: Arc<dyn AuthRepository>,
    store: Arc<dyn SessionRepository>,
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
}

impl AuthService {
    pub fn new(
        auth: Arc<dyn AuthRepository>,
        store: Arc<dyn SessionRepository>,
        session: Arc<Session>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth,
            store,
            session,
            notifier,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Loads the persisted token into the session.
    ///
    /// Returns whether a session was restored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the store cannot be read.
    pub fn restore(&self) -> Result<bool, AppError> {
        match self.store.load()? {
            Some(token) => {
                self.session.set(token);
                info!("Session restored");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Signs in and persists the token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for empty credentials, the backend
    /// error for rejected credentials, or [`AppError::Storage`] if the token
    /// cannot be saved. The session is left unchanged on error.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AppError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        request.check()?;

        let token = match self.auth.login(request).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.notifier.error(&e.user_message(LOGIN_FAILED_MESSAGE));
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&token) {
            warn!(error = %e, "Could not persist session");
            self.notifier.error(&e.to_string());
            return Err(e);
        }

        self.session.set(token);
        info!(username, "Logged in");
        self.notifier.success(LOGIN_SUCCESS_MESSAGE);
        Ok(())
    }

    /// Creates an account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for invalid input, or the backend error.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), AppError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        request.check()?;

        match self.auth.register(request).await {
            Ok(()) => {
                info!(username, "Registered");
                self.notifier.success(REGISTER_SUCCESS_MESSAGE);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.notifier.error(&e.user_message(REGISTER_FAILED_MESSAGE));
                Err(e)
            }
        }
    }

    /// Clears the session and the persisted token.
    ///
    /// The in-memory session is cleared even if the store fails.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the token file cannot be removed.
    pub fn logout(&self) -> Result<(), AppError> {
        self.session.clear();
        self.store.clear()?;
        info!("Logged out");
        Ok(())
    }
}

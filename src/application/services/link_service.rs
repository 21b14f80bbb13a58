//! Link mutations: create, update, delete, plus single-link lookups.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::services::LinkCollection;
use crate::domain::effects::Clipboard;
use crate::domain::entities::{LinkForm, LinkPatch, ShortLink, public_short_url};
use crate::domain::repositories::LinkRepository;
use crate::error::{AppError, ErrorRouter};

pub const CREATE_FAILED_MESSAGE: &str =
    "Failed to create short URL. Alias may be taken or URL is invalid.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete link.";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update link.";
pub const DETAILS_FAILED_MESSAGE: &str = "Failed to load link details.";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy link.";

/// Service for changing the signed-in user's links.
///
/// Every successful mutation invalidates the [`LinkCollection`] so the next
/// read reflects it. Failures are routed through the [`ErrorRouter`] and also
/// returned, so callers can keep their own state (e.g. the form) intact.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    collection: Arc<LinkCollection>,
    clipboard: Arc<dyn Clipboard>,
    router: ErrorRouter,
    frontend_origin: String,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        collection: Arc<LinkCollection>,
        clipboard: Arc<dyn Clipboard>,
        router: ErrorRouter,
        frontend_origin: impl Into<String>,
    ) -> Self {
        Self {
            links,
            collection,
            clipboard,
            router,
            frontend_origin: frontend_origin.into(),
        }
    }

    /// Public URL of `token`, `{frontend}/s/{token}`.
    pub fn public_url(&self, token: &str) -> String {
        public_short_url(&self.frontend_origin, token)
    }

    /// Validates and submits `form`.
    ///
    /// On success the public URL is copied to the clipboard (a copy failure is
    /// only logged), a success notification is shown, the collection is
    /// refetched and the form is reset. On failure the form keeps its values.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] without any network call when the form
    /// is invalid. Remote errors are routed before being returned.
    pub async fn create(&self, form: &mut LinkForm) -> Result<ShortLink, AppError> {
        let request = form.build()?;

        let link = match self.links.create(request).await {
            Ok(link) => link,
            Err(e) => {
                self.router.route(&e, CREATE_FAILED_MESSAGE);
                return Err(e);
            }
        };

        let public_url = self.public_url(&link.short_url);
        info!(short_url = %link.short_url, "Short link created");

        if let Err(e) = self.clipboard.copy(&public_url) {
            warn!(error = %e, "Could not copy short link to clipboard");
        }
        self.router
            .notifier()
            .success(&format!("Link Created & Copied! {public_url}"));

        self.collection.invalidate();
        self.collection.refetch().await;
        form.reset();

        Ok(link)
    }

    /// Deletes a link and refreshes the collection.
    ///
    /// # Errors
    ///
    /// Returns the routed remote error.
    pub async fn delete(&self, short_url: &str) -> Result<(), AppError> {
        if let Err(e) = self.links.delete(short_url).await {
            self.router.route(&e, DELETE_FAILED_MESSAGE);
            return Err(e);
        }

        info!(short_url, "Short link deleted");
        self.router
            .notifier()
            .success(&format!("Link '{short_url}' deleted."));

        self.collection.invalidate();
        self.collection.refetch().await;
        Ok(())
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid patch, without a
    /// network call. Remote errors are routed before being returned.
    pub async fn update(&self, short_url: &str, patch: LinkPatch) -> Result<ShortLink, AppError> {
        patch.validate()?;

        match self.links.update(short_url, patch).await {
            Ok(link) => {
                info!(short_url, "Short link updated");
                self.router
                    .notifier()
                    .success(&format!("Link '{}' updated.", link.short_url));
                self.collection.invalidate();
                Ok(link)
            }
            Err(e) => {
                self.router.route(&e, UPDATE_FAILED_MESSAGE);
                Err(e)
            }
        }
    }

    /// Fetches a single link.
    ///
    /// # Errors
    ///
    /// Returns the routed remote error.
    pub async fn details(&self, short_url: &str) -> Result<ShortLink, AppError> {
        self.links.details(short_url).await.inspect_err(|e| {
            self.router.route(e, DETAILS_FAILED_MESSAGE);
        })
    }

    /// Copies the public URL of `short_url` to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the clipboard is unavailable.
    pub fn copy(&self, short_url: &str) -> Result<String, AppError> {
        let public_url = self.public_url(short_url);
        match self.clipboard.copy(&public_url) {
            Ok(()) => {
                self.router.notifier().success("Link copied!");
                Ok(public_url)
            }
            Err(e) => {
                warn!(error = %e, "Clipboard copy failed");
                self.router.notifier().error(COPY_FAILED_MESSAGE);
                Err(e)
            }
        }
    }
}

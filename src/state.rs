//! Application wiring.
//!
//! [`AppState`] builds the object graph once per process: one session, one
//! HTTP client shared by every repository, one error router and one link
//! collection shared by the services that read or invalidate it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use crate::application::services::{
    AnalyticsPanel, AuthService, LinkCollection, LinkService, RedirectResolver,
};
use crate::config::Config;
use crate::domain::effects::{AuthFailureHandler, Clipboard, Navigator, Notifier};
use crate::domain::entities::Session;
use crate::domain::repositories::{
    AuthRepository, LinkRepository, SessionRepository, StatsRepository,
};
use crate::error::{AppError, ErrorRouter};
use crate::infrastructure::http::{
    ApiClient, HttpAuthRepository, HttpLinkRepository, HttpStatsRepository,
};
use crate::infrastructure::persistence::FileSessionRepository;
use crate::infrastructure::terminal::{SystemClipboard, TerminalNavigator, TerminalNotifier};

/// Front-end implementations of the presentation boundaries.
#[derive(Clone)]
pub struct Effects {
    pub notifier: Arc<dyn Notifier>,
    pub clipboard: Arc<dyn Clipboard>,
    pub navigator: Arc<dyn Navigator>,
}

impl Effects {
    pub fn terminal() -> Self {
        Self {
            notifier: Arc::new(TerminalNotifier),
            clipboard: Arc::new(SystemClipboard),
            navigator: Arc::new(TerminalNavigator),
        }
    }
}

/// Shared services for one signed-in (or anonymous) user.
///
/// Auth failures (401/403) from any routed call are recorded rather than acted
/// on immediately; the front end checks [`Self::auth_failure`] and sends the
/// user back to login through [`AuthService::logout`].
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<Session>,
    pub router: ErrorRouter,
    pub collection: Arc<LinkCollection>,
    pub links: Arc<LinkService>,
    pub auth: Arc<AuthService>,
    pub redirects: Arc<RedirectResolver>,
    stats: Arc<dyn StatsRepository>,
    auth_failure: Arc<AtomicU16>,
}

impl AppState {
    /// Wires the REST repositories and the file session store.
    ///
    /// The persisted session, if any, is restored before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the session file
    /// cannot be read.
    pub fn new(config: Config, effects: Effects) -> Result<Self, AppError> {
        let store: Arc<dyn SessionRepository> =
            Arc::new(FileSessionRepository::new(config.session_file.clone()));
        let session = Arc::new(Session::default());

        let client = ApiClient::new(
            &config.backend_url,
            Arc::clone(&session),
            config.request_timeout(),
        )?;

        let links: Arc<dyn LinkRepository> = Arc::new(HttpLinkRepository::new(client.clone()));
        let stats: Arc<dyn StatsRepository> = Arc::new(HttpStatsRepository::new(client.clone()));
        let auth = Arc::new(HttpAuthRepository::new(client));

        let state = Self::assemble(config, effects, session, store, links, stats, auth);
        state.auth.restore()?;
        Ok(state)
    }

    /// Wires the given repositories around `session` without touching the store.
    pub fn assemble(
        config: Config,
        effects: Effects,
        session: Arc<Session>,
        store: Arc<dyn SessionRepository>,
        links: Arc<dyn LinkRepository>,
        stats: Arc<dyn StatsRepository>,
        auth: Arc<dyn AuthRepository>,
    ) -> Self {
        let auth_failure = Arc::new(AtomicU16::new(0));
        let recorded = Arc::clone(&auth_failure);
        let on_auth_failure: AuthFailureHandler = Arc::new(move |status: u16| {
            recorded.store(status, Ordering::SeqCst);
        });

        let router = ErrorRouter::new(Arc::clone(&effects.notifier), on_auth_failure);

        let collection = Arc::new(LinkCollection::new(
            Arc::clone(&links),
            Arc::clone(&stats),
            config.stale_time(),
            router.clone(),
        ));

        let link_service = Arc::new(LinkService::new(
            links,
            Arc::clone(&collection),
            effects.clipboard,
            router.clone(),
            config.frontend_url.clone(),
        ));

        let auth_service = Arc::new(AuthService::new(
            auth,
            store,
            Arc::clone(&session),
            effects.notifier,
        ));

        let redirects = Arc::new(RedirectResolver::new(
            config.backend_url.clone(),
            config.redirect_delay(),
            effects.navigator,
        ));

        Self {
            config,
            session,
            router,
            collection,
            links: link_service,
            auth: auth_service,
            redirects,
            stats,
            auth_failure,
        }
    }

    /// A fresh analytics panel for one link. Panels never share data.
    pub fn analytics_panel(&self, short_url: &str) -> Arc<AnalyticsPanel> {
        AnalyticsPanel::new(short_url, Arc::clone(&self.stats), self.router.clone())
    }

    /// Status of the last rejected authenticated call, if any.
    pub fn auth_failure(&self) -> Option<u16> {
        match self.auth_failure.load(Ordering::SeqCst) {
            0 => None,
            status => Some(status),
        }
    }

    /// Signs out after the backend rejected the session and drops cached data.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the session file cannot be removed.
    pub fn expire_session(&self) -> Result<(), AppError> {
        self.collection.clear();
        self.auth_failure.store(0, Ordering::SeqCst);
        self.auth.logout()
    }
}

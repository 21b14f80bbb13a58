//! Client-side resolution of short tokens to the backend redirect endpoint.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::effects::Navigator;
use crate::utils::url_pattern::extract_token;

/// `{backend_origin}/{token}`.
pub fn redirect_target(backend_origin: &str, token: &str) -> String {
    format!("{}/{}", backend_origin.trim_end_matches('/'), token)
}

/// Schedules one full navigation per token after a short delay.
///
/// The delay only exists so a "redirecting" indicator can render. There is no
/// retry and no fallback: once navigation is issued, unknown tokens are the
/// backend's concern.
pub struct RedirectResolver {
    backend_origin: String,
    delay: Duration,
    navigator: Arc<dyn Navigator>,
    pending: Mutex<Option<(String, JoinHandle<()>)>>,
}

impl RedirectResolver {
    pub fn new(
        backend_origin: impl Into<String>,
        delay: Duration,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            backend_origin: backend_origin.into(),
            delay,
            navigator,
            pending: Mutex::new(None),
        }
    }

    /// Resolves `path_or_token` (`/s/{token}`, `/{token}` or a bare token) and
    /// schedules the navigation. Returns the target, or `None` if no token
    /// could be extracted.
    ///
    /// Resolving the token that is already pending is a no-op. A different
    /// token cancels the pending navigation and schedules a new one.
    pub fn resolve(&self, path_or_token: &str) -> Option<String> {
        let Some(token) = extract_token(path_or_token) else {
            warn!(path = path_or_token, "No short token in path");
            return None;
        };
        let target = redirect_target(&self.backend_origin, &token);

        let mut pending = self.pending.lock();

        if let Some((pending_token, handle)) = pending.as_ref()
            && *pending_token == token
            && !handle.is_finished()
        {
            debug!(token = %token, "Redirect already pending");
            return Some(target);
        }

        if let Some((previous, handle)) = pending.take() {
            debug!(token = %previous, "Cancelling pending redirect");
            handle.abort();
        }

        let navigator = Arc::clone(&self.navigator);
        let delay = self.delay;
        let url = target.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            info!(target = %url, "Redirecting");
            navigator.navigate(&url);
        });

        *pending = Some((token, handle));
        Some(target)
    }

    /// Cancels the pending navigation. Returns true if one was cancelled.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().take() {
            Some((token, handle)) if !handle.is_finished() => {
                debug!(token = %token, "Redirect cancelled");
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }

    /// Waits for the pending navigation, if any, to fire.
    pub async fn wait(&self) {
        let handle = self.pending.lock().take();
        if let Some((_, handle)) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for RedirectResolver {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.pending.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingNavigator {
        visits: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, url: &str) {
            self.visits.lock().push(url.to_string());
        }
    }

    const DELAY: Duration = Duration::from_millis(500);

    fn resolver() -> (RedirectResolver, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::default());
        let resolver = RedirectResolver::new("http://localhost:8089/", DELAY, navigator.clone());
        (resolver, navigator)
    }

    #[test]
    fn test_target_shape() {
        assert_eq!(
            redirect_target("http://localhost:8089/", "abc"),
            "http://localhost:8089/abc"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigates_once_after_delay() {
        let (resolver, navigator) = resolver();

        let target = resolver.resolve("/s/abc123");
        assert_eq!(target.as_deref(), Some("http://localhost:8089/abc123"));

        tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
        assert!(navigator.visits.lock().is_empty());
        assert!(resolver.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*navigator.visits.lock(), vec!["http://localhost:8089/abc123"]);
        assert!(!resolver.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_token_is_not_duplicated() {
        let (resolver, navigator) = resolver();

        resolver.resolve("/s/abc");
        tokio::time::sleep(Duration::from_millis(300)).await;
        resolver.resolve("abc");
        tokio::time::sleep(Duration::from_millis(250)).await;

        // Fired on the original schedule, only once.
        assert_eq!(navigator.visits.lock().len(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(navigator.visits.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_token_reschedules() {
        let (resolver, navigator) = resolver();

        resolver.resolve("/s/first");
        tokio::time::sleep(Duration::from_millis(300)).await;
        resolver.resolve("/s/second");
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(*navigator.visits.lock(), vec!["http://localhost:8089/second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_drop_abort() {
        let (resolver, navigator) = resolver();

        resolver.resolve("/s/abc");
        assert!(resolver.cancel());
        assert!(!resolver.cancel());

        resolver.resolve("/s/def");
        drop(resolver);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(navigator.visits.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_token() {
        let (resolver, _) = resolver();
        assert_eq!(resolver.resolve("/s/"), None);
        assert!(!resolver.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolving_after_fire_navigates_again() {
        let (resolver, navigator) = resolver();

        resolver.resolve("abc");
        resolver.wait().await;
        resolver.resolve("abc");
        resolver.wait().await;

        assert_eq!(navigator.visits.lock().len(), 2);
    }
}

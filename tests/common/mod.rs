#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use shortify_dashboard::config::Config;
use shortify_dashboard::domain::effects::{Clipboard, Navigator, Notifier};
use shortify_dashboard::domain::entities::Session;
use shortify_dashboard::error::AppError;
use shortify_dashboard::infrastructure::http::ApiClient;
use shortify_dashboard::state::{AppState, Effects};

pub const TOKEN: &str = "test-jwt";
pub const USERNAME: &str = "ana";
pub const PASSWORD: &str = "secret1";

/// One request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

/// In-memory state of the fake shortener API.
#[derive(Default)]
pub struct BackendState {
    links: Mutex<Vec<Value>>,
    clicks: Mutex<serde_json::Map<String, Value>>,
    analytics: Mutex<Vec<Value>>,
    requests: Mutex<HashMap<&'static str, Vec<Recorded>>>,
    latency: Mutex<Duration>,
    failure: Mutex<Option<(u16, Option<String>)>>,
    next_id: AtomicI64,
}

impl BackendState {
    /// Records the request, applies latency and forced failures, checks auth.
    async fn enter(
        &self,
        route: &'static str,
        headers: &HeaderMap,
        query: HashMap<String, String>,
        body: Option<Value>,
        authenticated: bool,
    ) -> Result<(), Response> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string);

        self.requests
            .lock()
            .entry(route)
            .or_default()
            .push(Recorded {
                query,
                body,
                bearer: bearer.clone(),
            });

        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if let Some((status, message)) = self.failure.lock().clone() {
            return Err(error_response(status, message.as_deref()));
        }

        if authenticated && bearer.as_deref() != Some(TOKEN) {
            return Err(StatusCode::UNAUTHORIZED.into_response());
        }

        Ok(())
    }

    fn find(&self, short_url: &str) -> Option<Value> {
        self.links
            .lock()
            .iter()
            .find(|l| l["shortUrl"] == short_url)
            .cloned()
    }
}

fn error_response(status: u16, message: Option<&str>) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match message {
        Some(message) => (status, Json(json!({ "message": message }))).into_response(),
        None => status.into_response(),
    }
}

fn now_stamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string()
}

type Shared = State<Arc<BackendState>>;

async fn shorten(State(s): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = s
        .enter("shorten", &headers, HashMap::new(), Some(body.clone()), true)
        .await
    {
        return r;
    }

    let id = s.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let short_url = body["customAlias"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| format!("gen{id}"));

    if s.find(&short_url).is_some() {
        return error_response(409, Some("Alias is already in use"));
    }

    let link = json!({
        "id": id,
        "shortUrl": short_url,
        "originalUrl": body["originalUrl"],
        "clickCount": 0,
        "createdDate": now_stamp(),
        "category": body.get("category").cloned().unwrap_or(Value::Null),
        "protectedUrl": body["isProtected"],
    });
    s.links.lock().push(link.clone());
    Json(link).into_response()
}

async fn my_urls(State(s): Shared, headers: HeaderMap) -> Response {
    if let Err(r) = s.enter("myurls", &headers, HashMap::new(), None, true).await {
        return r;
    }
    Json(s.links.lock().clone()).into_response()
}

async fn total_clicks(
    State(s): Shared,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = s.enter("totalClicks", &headers, query, None, true).await {
        return r;
    }
    Json(Value::Object(s.clicks.lock().clone())).into_response()
}

async fn analytics(
    State(s): Shared,
    headers: HeaderMap,
    Path(_alias): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(r) = s.enter("analytics", &headers, query, None, true).await {
        return r;
    }
    Json(s.analytics.lock().clone()).into_response()
}

async fn details(State(s): Shared, headers: HeaderMap, Path(short_url): Path<String>) -> Response {
    if let Err(r) = s.enter("details", &headers, HashMap::new(), None, true).await {
        return r;
    }
    match s.find(&short_url) {
        Some(link) => Json(link).into_response(),
        None => error_response(404, Some("Link not found")),
    }
}

async fn update(
    State(s): Shared,
    headers: HeaderMap,
    Path(short_url): Path<String>,
    Json(patch): Json<Value>,
) -> Response {
    if let Err(r) = s
        .enter("update", &headers, HashMap::new(), Some(patch.clone()), true)
        .await
    {
        return r;
    }

    let mut links = s.links.lock();
    let Some(link) = links.iter_mut().find(|l| l["shortUrl"] == short_url) else {
        return error_response(404, Some("Link not found"));
    };
    if let Some(alias) = patch.get("customAlias") {
        link["shortUrl"] = alias.clone();
        link["customAlias"] = alias.clone();
    }
    if let Some(active) = patch.get("isActive") {
        link["active"] = active.clone();
    }
    if let Some(category) = patch.get("category") {
        link["category"] = category.clone();
    }
    Json(link.clone()).into_response()
}

async fn delete(State(s): Shared, headers: HeaderMap, Path(short_url): Path<String>) -> Response {
    if let Err(r) = s.enter("delete", &headers, HashMap::new(), None, true).await {
        return r;
    }
    let mut links = s.links.lock();
    let before = links.len();
    links.retain(|l| l["shortUrl"] != short_url);
    if links.len() == before {
        return error_response(404, Some("Link not found"));
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn login(State(s): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = s
        .enter("login", &headers, HashMap::new(), Some(body.clone()), false)
        .await
    {
        return r;
    }
    if body["username"] == USERNAME && body["password"] == PASSWORD {
        Json(json!({ "token": TOKEN })).into_response()
    } else {
        error_response(401, Some("Bad credentials"))
    }
}

async fn register(State(s): Shared, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = s
        .enter("register", &headers, HashMap::new(), Some(body.clone()), false)
        .await
    {
        return r;
    }
    if body["username"] == "taken" {
        return error_response(400, Some("Username is already taken"));
    }
    "User registered successfully".into_response()
}

/// Fake backend listening on an ephemeral local port.
pub struct FakeBackend {
    pub url: String,
    pub state: Arc<BackendState>,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());

        let app = Router::new()
            .route("/api/urls/shorten", post(shorten))
            .route("/api/urls/myurls", get(my_urls))
            .route("/api/urls/totalClicks", get(total_clicks))
            .route("/api/urls/analytics/{alias}", get(analytics))
            .route(
                "/api/urls/{short_url}",
                get(details).put(update).delete(delete),
            )
            .route("/api/auth/public/login", post(login))
            .route("/api/auth/public/register", post(register))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn add_link(&self, short_url: &str, original_url: &str, created_date: &str) {
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.links.lock().push(json!({
            "id": id,
            "shortUrl": short_url,
            "originalUrl": original_url,
            "clickCount": 0,
            "createdDate": created_date,
        }));
    }

    pub fn set_clicks(&self, clicks: Value) {
        if let Value::Object(map) = clicks {
            *self.state.clicks.lock() = map;
        }
    }

    pub fn set_analytics(&self, events: Value) {
        if let Value::Array(events) = events {
            *self.state.analytics.lock() = events;
        }
    }

    pub fn set_latency(&self, latency: Duration) {
        *self.state.latency.lock() = latency;
    }

    /// Every request fails with `status` until [`Self::recover`].
    pub fn fail_with(&self, status: u16, message: Option<&str>) {
        *self.state.failure.lock() = Some((status, message.map(str::to_string)));
    }

    pub fn recover(&self) {
        *self.state.failure.lock() = None;
    }

    pub fn calls(&self, route: &str) -> usize {
        self.state.requests.lock().get(route).map_or(0, Vec::len)
    }

    pub fn last_request(&self, route: &str) -> Option<Recorded> {
        self.state
            .requests
            .lock()
            .get(route)
            .and_then(|r| r.last().cloned())
    }

    pub fn link_count(&self) -> usize {
        self.state.links.lock().len()
    }

    pub fn client(&self, token: Option<&str>) -> ApiClient {
        let session = Arc::new(Session::new(token.map(str::to_string)));
        ApiClient::new(&self.url, session, Duration::from_secs(5)).unwrap()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Notification kinds, in the order they were shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notes: Mutex<Vec<Note>>,
}

impl RecordingNotifier {
    pub fn errors(&self) -> Vec<String> {
        self.notes
            .lock()
            .iter()
            .filter_map(|n| match n {
                Note::Error(m) => Some(m.clone()),
                Note::Success(_) => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.notes
            .lock()
            .iter()
            .filter_map(|n| match n {
                Note::Success(m) => Some(m.clone()),
                Note::Error(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notes.lock().push(Note::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notes.lock().push(Note::Error(message.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub copied: Mutex<Vec<String>>,
}

impl Clipboard for RecordingClipboard {
    fn copy(&self, text: &str) -> Result<(), AppError> {
        self.copied.lock().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub visits: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.visits.lock().push(url.to_string());
    }
}

/// Wired client talking to `backend`, with recording effects.
pub struct TestApp {
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
    pub clipboard: Arc<RecordingClipboard>,
    pub navigator: Arc<RecordingNavigator>,
    pub session_dir: TempDir,
}

impl TestApp {
    /// Signed-in client; the session file already holds the test token.
    pub fn signed_in(backend: &FakeBackend) -> Self {
        Self::build(backend, Some(TOKEN), |_| {})
    }

    pub fn signed_out(backend: &FakeBackend) -> Self {
        Self::build(backend, None, |_| {})
    }

    pub fn build(backend: &FakeBackend, token: Option<&str>, tweak: impl FnOnce(&mut Config)) -> Self {
        let session_dir = TempDir::new().unwrap();
        let session_file = session_dir.path().join("session");
        if let Some(token) = token {
            std::fs::write(&session_file, token).unwrap();
        }

        let mut config = Config {
            backend_url: backend.url.clone(),
            frontend_url: "https://shortifyx.com".to_string(),
            session_file,
            redirect_delay_ms: 50,
            ..Config::default()
        };
        tweak(&mut config);

        let notifier = Arc::new(RecordingNotifier::default());
        let clipboard = Arc::new(RecordingClipboard::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let effects = Effects {
            notifier: notifier.clone(),
            clipboard: clipboard.clone(),
            navigator: navigator.clone(),
        };

        let state = AppState::new(config, effects).unwrap();

        Self {
            state,
            notifier,
            clipboard,
            navigator,
            session_dir,
        }
    }
}

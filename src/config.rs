//! Client configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before any request is
//! made. A `.env` file in the working directory is honored (see `main.rs`).
//!
//! ```bash
//! export BACKEND_URL="https://api.shortifyx.com"
//! export FRONTEND_URL="https://shortifyx.com"
//! ```
//!
//! ## Optional Variables
//!
//! - `BACKEND_URL` - API and redirect origin (default: `http://localhost:8089`)
//! - `FRONTEND_URL` - Origin of public short links (default: `https://shortifyx.com`)
//! - `QUERY_STALE_TIME_MS` - How long cached reads stay fresh (default: 5000)
//! - `REDIRECT_DELAY_MS` - Delay before a redirect navigation (default: 500)
//! - `REQUEST_TIMEOUT_SECS` - HTTP request timeout (default: 30, range: 1-300)
//! - `SESSION_FILE` - Where the session token is kept (default: `$HOME/.shortify/session`)
//! - `RUST_LOG` - Log level (default: `warn`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::utils::url_pattern::normalize_origin;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8089";
pub const DEFAULT_FRONTEND_URL: &str = "https://shortifyx.com";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin of the REST API; redirects go to `{backend_url}/{token}`.
    pub backend_url: String,
    /// Origin used to build public short links, `{frontend_url}/s/{token}`.
    pub frontend_url: String,
    pub query_stale_time_ms: u64,
    pub redirect_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub session_file: PathBuf,
    pub log_level: String,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            query_stale_time_ms: 5_000,
            redirect_delay_ms: 500,
            request_timeout_secs: 30,
            session_file: default_session_file(),
            log_level: "warn".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unparseable numbers fall back to their defaults. Origins are normalized
    /// when they parse; [`Self::validate`] rejects the ones that don't.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but not valid Unicode.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let backend_url = load_origin("BACKEND_URL", DEFAULT_BACKEND_URL)?;
        let frontend_url = load_origin("FRONTEND_URL", DEFAULT_FRONTEND_URL)?;

        let query_stale_time_ms = load_number("QUERY_STALE_TIME_MS", defaults.query_stale_time_ms);
        let redirect_delay_ms = load_number("REDIRECT_DELAY_MS", defaults.redirect_delay_ms);
        let request_timeout_secs =
            load_number("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs);

        let session_file = env::var_os("SESSION_FILE")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        let log_level = env::var("RUST_LOG").unwrap_or(defaults.log_level);
        let log_format = env::var("LOG_FORMAT").unwrap_or(defaults.log_format);

        Ok(Self {
            backend_url,
            frontend_url,
            query_stale_time_ms,
            redirect_delay_ms,
            request_timeout_secs,
            session_file,
            log_level,
            log_format,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `BACKEND_URL` or `FRONTEND_URL` is not an http(s) origin
    /// - `QUERY_STALE_TIME_MS` is 0
    /// - `REQUEST_TIMEOUT_SECS` is outside 1-300
    /// - `LOG_FORMAT` is not `text` or `json`
    pub fn validate(&self) -> Result<()> {
        normalize_origin(&self.backend_url)
            .with_context(|| format!("BACKEND_URL is invalid: '{}'", self.backend_url))?;
        normalize_origin(&self.frontend_url)
            .with_context(|| format!("FRONTEND_URL is invalid: '{}'", self.frontend_url))?;

        if self.query_stale_time_ms == 0 {
            anyhow::bail!("QUERY_STALE_TIME_MS must be greater than 0");
        }

        if !(1..=300).contains(&self.request_timeout_secs) {
            anyhow::bail!(
                "REQUEST_TIMEOUT_SECS must be between 1 and 300, got {}",
                self.request_timeout_secs
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if self.session_file.as_os_str().is_empty() {
            anyhow::bail!("SESSION_FILE must not be empty");
        }

        Ok(())
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_millis(self.query_stale_time_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Logs the configuration at debug level.
    pub fn print_summary(&self) {
        tracing::debug!("Configuration loaded:");
        tracing::debug!("  Backend: {}", self.backend_url);
        tracing::debug!("  Frontend: {}", self.frontend_url);
        tracing::debug!("  Query stale time: {} ms", self.query_stale_time_ms);
        tracing::debug!("  Redirect delay: {} ms", self.redirect_delay_ms);
        tracing::debug!("  Request timeout: {} s", self.request_timeout_secs);
        tracing::debug!("  Session file: {}", self.session_file.display());
        tracing::debug!("  Log format: {}", self.log_format);
    }
}

fn default_session_file() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".shortify")
        .join("session")
}

fn load_number(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn load_origin(name: &str, default: &str) -> Result<String> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            Ok(normalize_origin(&raw).unwrap_or_else(|_| raw.trim().to_string()))
        }
        Ok(_) | Err(env::VarError::NotPresent) => Ok(default.to_string()),
        Err(e) => Err(e).with_context(|| format!("{name} is not valid Unicode")),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

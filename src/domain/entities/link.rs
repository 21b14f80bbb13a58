//! Short link entity as returned by the backend.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shortened link owned by the current user.
///
/// Server-owned: the client never mutates a `ShortLink` in place, it refetches
/// the collection after a mutation instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLink {
    pub id: i64,
    /// The short token, as in `{frontend}/s/{short_url}`.
    pub short_url: String,
    pub original_url: String,
    #[serde(default)]
    pub click_count: u64,
    pub created_date: NaiveDateTime,
    #[serde(default)]
    pub custom_alias: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub expires_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub protected_url: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl ShortLink {
    /// Creates a link with only the fields the dashboard relies on.
    pub fn new(
        id: i64,
        short_url: String,
        original_url: String,
        click_count: u64,
        created_date: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            short_url,
            original_url,
            click_count,
            created_date,
            custom_alias: None,
            category: None,
            expires_at: None,
            protected_url: None,
            active: None,
        }
    }

    /// Public URL handed out to end users.
    pub fn public_url(&self, frontend_origin: &str) -> String {
        public_short_url(frontend_origin, &self.short_url)
    }

    /// Creation date as shown in the link list, e.g. `Jan 05, 2025`.
    pub fn created_label(&self) -> String {
        self.created_date.format("%b %d, %Y").to_string()
    }

    /// Returns true if the link carries an expiry that lies before `now`.
    ///
    /// Expiry is a naive wall-clock value, compared as UTC.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expires| expires.and_utc() <= now)
    }
}

/// Builds `{frontend_origin}/s/{token}`.
pub fn public_short_url(frontend_origin: &str, token: &str) -> String {
    format!("{}/s/{}", frontend_origin.trim_end_matches('/'), token)
}

/// Host-only display form, `host/s/{token}`, with the scheme stripped.
pub fn display_short_url(frontend_origin: &str, token: &str) -> String {
    let origin = frontend_origin.trim_end_matches('/');
    let host = origin
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(origin);
    format!("{}/s/{}", host, token)
}

/// Orders links by descending creation date, newest first.
pub fn sort_newest_first(links: &mut [ShortLink]) {
    links.sort_by(|a, b| b.created_date.cmp(&a.created_date));
}

//! # Shortify Dashboard
//!
//! Client core for a link-shortening dashboard: create short links, browse and
//! manage them, and chart their clicks against a REST backend.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, click aggregation and the traits the core depends on
//! - **Application Layer** ([`application`]) - Cached queries and the services front ends drive
//! - **Infrastructure Layer** ([`infrastructure`]) - HTTP repositories, query cache, session file and terminal effects
//!
//! ## Features
//!
//! - Link creation with client-side validation and clipboard copy
//! - Keyed query cache with de-duplicated fetches and stale-while-revalidate
//! - Daily click series for the dashboard and per-link analytics panels
//! - Delayed redirect resolution for short tokens
//! - Token sessions persisted between runs
//!
//! ## Quick Start
//!
//! ```bash
//! export BACKEND_URL="http://localhost:8089"
//!
//! shortify login
//! shortify shorten https://example.com/some/long/path
//! shortify links
//! ```
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for front ends
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AnalyticsPanel, AuthService, DashboardSummary, LinkCollection, LinkService,
        RedirectResolver,
    };
    pub use crate::domain::chart::ChartData;
    pub use crate::domain::entities::{
        ClickEvent, DailyClickBucket, DateRange, LinkForm, LinkPatch, Session, ShortLink,
    };
    pub use crate::error::{AppError, ErrorRouter, FormField};
    pub use crate::infrastructure::cache::QueryState;
    pub use crate::state::{AppState, Effects};
}

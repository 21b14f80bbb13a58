//! Application layer: the dashboard's use cases.
//!
//! Services consume the domain traits and never talk to `reqwest` or the
//! terminal directly.
//!
//! # Available Services
//!
//! - [`services::LinkCollection`] - Cached link list and click totals
//! - [`services::LinkService`] - Create, update, delete and copy links
//! - [`services::AnalyticsPanel`] - Per-link click analytics
//! - [`services::AuthService`] - Session lifecycle
//! - [`services::RedirectResolver`] - Short token to redirect navigation

pub mod queries;
pub mod services;

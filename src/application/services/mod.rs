//! Services coordinating repositories, the query cache and the presentation
//! boundaries.

pub mod analytics_panel;
pub mod auth_service;
pub mod link_collection;
pub mod link_service;
pub mod redirect_resolver;

pub use analytics_panel::AnalyticsPanel;
pub use auth_service::AuthService;
pub use link_collection::{DashboardSummary, LinkCollection};
pub use link_service::LinkService;
pub use redirect_resolver::{RedirectResolver, redirect_target};

//! REST implementations of the backend repositories.
//!
//! All repositories share one [`ApiClient`], so they reuse connections and see
//! the same session.

mod api_client;
mod http_auth_repository;
mod http_link_repository;
mod http_stats_repository;

pub use api_client::ApiClient;
pub use http_auth_repository::HttpAuthRepository;
pub use http_link_repository::HttpLinkRepository;
pub use http_stats_repository::HttpStatsRepository;

//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the backend and local storage so services can be
//! tested without a network. Implementations live in
//! `crate::infrastructure`; mocks are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Short link CRUD
//! - [`StatsRepository`] - Click totals and per-link analytics
//! - [`AuthRepository`] - Login and registration
//! - [`SessionRepository`] - Session token persistence

pub mod auth_repository;
pub mod link_repository;
pub mod session_repository;
pub mod stats_repository;

pub use auth_repository::AuthRepository;
pub use link_repository::LinkRepository;
pub use session_repository::SessionRepository;
pub use stats_repository::StatsRepository;

#[cfg(test)]
pub use auth_repository::MockAuthRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use stats_repository::MockStatsRepository;

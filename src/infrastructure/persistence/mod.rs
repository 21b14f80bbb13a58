//! Local persistence.
//!
//! # Repositories
//!
//! - [`FileSessionRepository`] - Session token kept in a file between runs

pub mod file_session_repository;

pub use file_session_repository::FileSessionRepository;

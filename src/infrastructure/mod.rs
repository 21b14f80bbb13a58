//! Infrastructure layer for external integrations.
//!
//! Implements the traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Keyed query cache in front of backend reads
//! - [`http`] - REST repositories over `reqwest`
//! - [`persistence`] - Session token storage
//! - [`terminal`] - Notifications, clipboard and navigation for the CLI

pub mod cache;
pub mod http;
pub mod persistence;
pub mod terminal;

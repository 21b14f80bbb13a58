//! Domain layer: entities, pure transformations and the traits the core
//! depends on.
//!
//! # Architecture
//!
//! - [`entities`] - Backend data and mutation payloads
//! - [`repositories`] - Backend and storage contracts
//! - [`effects`] - Notifications, clipboard and navigation contracts
//! - [`click_aggregator`] - Click events to per-day series
//! - [`chart`] - Chart-ready series
//!
//! Nothing here performs I/O. Implementations of the traits live in
//! [`crate::infrastructure`].

pub mod chart;
pub mod click_aggregator;
pub mod effects;
pub mod entities;
pub mod repositories;

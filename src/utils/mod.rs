//! Helpers shared across layers.
//!
//! - [`datetime`] - Form date inputs, ISO instants and backend timestamps
//! - [`url_pattern`] - URL shape checks, origin normalization and token extraction

pub mod datetime;
pub mod url_pattern;

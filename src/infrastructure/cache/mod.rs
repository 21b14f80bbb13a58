//! Keyed query cache for backend reads.
//!
//! Provides the [`Query`] trait describing a cacheable read and
//! [`QueryCache`], which de-duplicates concurrent reads, applies a staleness
//! window and routes failures.

mod query;
mod query_cache;

pub use query::{Query, QueryKey, QueryState};
pub use query_cache::QueryCache;

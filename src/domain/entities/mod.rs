//! Data exchanged with the shortener backend.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A link owned by the signed-in user
//! - [`ClickEvent`] / [`DailyClickBucket`] - Raw clicks and per-day counts
//! - [`LinkForm`] / [`CreateLinkRequest`] / [`LinkPatch`] - Link mutations
//! - [`Session`] - Bearer token of the signed-in user
//!
//! Server-owned entities are read-only on the client: after a mutation the
//! affected collection is refetched rather than patched locally.

pub mod click;
pub mod link;
pub mod link_request;
pub mod session;

pub use click::{ClickEvent, DailyClickBucket, DateRange, InstantRange};
pub use link::{ShortLink, display_short_url, public_short_url, sort_newest_first};
pub use link_request::{CreateLinkRequest, LinkForm, LinkPatch};
pub use session::{LoginRequest, LoginResponse, RegisterRequest, Session};

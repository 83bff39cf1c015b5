//! API handlers for Be The Hero.
//!
//! Flow Overview:
//! 1) Validate headers, query, path and body (`api::validation`).
//! 2) Apply the domain rule (ONG existence, ownership).
//! 3) Call the injected store and shape the response.
//!
//! Handlers never talk to a concrete database; they receive the `DynStore`
//! built at startup through an axum `Extension`.

pub mod health;
pub mod incidents;
pub mod ongs;
pub mod profile;
pub mod root;
pub mod sessions;
pub mod types;

/// Incidents returned per listing page.
pub const PAGE_SIZE: i64 = 5;

/// Header carrying the unpaginated incident total.
pub const X_TOTAL_COUNT: &str = "x-total-count";

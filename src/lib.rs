//! # Be The Hero
//!
//! `bethehero` is a small REST service that connects people with ONGs
//! (charitable organizations) that need help.
//!
//! ## Organizations
//!
//! An ONG registers once and receives an 8 character identifier. That
//! identifier is both its primary key and its credential: every authorized
//! request re-sends it in the `Authorization` header. There is no server-side
//! session, so `POST /sessions` only confirms the identifier exists.
//!
//! ## Incidents
//!
//! Incidents are help requests (title, description, value) owned by exactly
//! one ONG. Anyone can list them, five per page, newest first, with the total
//! in `X-Total-Count`. Only the owning ONG may delete one; a foreign caller
//! gets `403 Forbidden` and the row stays untouched.

pub mod api;
pub mod cli;
pub mod store;
pub mod unique_id;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

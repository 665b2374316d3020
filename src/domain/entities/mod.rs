//! Core domain entities.
//!
//! Entities are plain data structures; the rules that act on them live in
//! [`crate::application::services`].
//!
//! - [`ShortLink`] - A short key mapped to an original URL
//! - [`User`] - A user who may own links
//!
//! Creation inputs use separate structs (`NewShortLink`, `NewUser`) because the
//! store assigns identifiers.

pub mod short_link;
pub mod user;

pub use short_link::{NewShortLink, Owner, ShortLink};
pub use user::{NewUser, User};

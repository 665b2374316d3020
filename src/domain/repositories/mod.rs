//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the persistent store behind the link service.
//! Implementations live in `crate::infrastructure`.
//!
//! # Available Repositories
//!
//! - [`ShortLinkRepository`] - Short link storage, uniqueness and click counting
//! - [`UserRepository`] - Owner lookups
//!
//! # Testing
//!
//! Mock implementations are generated via `mockall` under `cfg(test)`.
//! See `tests/repository_*.rs` for the PostgreSQL implementation tests.

pub mod short_link_repository;
pub mod user_repository;

pub use short_link_repository::ShortLinkRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use short_link_repository::MockShortLinkRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;

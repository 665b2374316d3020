//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` row types.
//!
//! # Repositories
//!
//! - [`PgShortLinkRepository`] - Short link storage, uniqueness and click counting
//! - [`PgUserRepository`] - User lookups and registration

pub mod pg_short_link_repository;
pub mod pg_user_repository;

pub use pg_short_link_repository::PgShortLinkRepository;
pub use pg_user_repository::PgUserRepository;

//! In-memory repository implementations.
//!
//! Used by `STORAGE_BACKEND=memory` and by the HTTP integration tests. Both
//! stores are safe to share across request handlers.

pub mod short_link_repository;
pub mod user_repository;

pub use short_link_repository::MemoryShortLinkRepository;
pub use user_repository::MemoryUserRepository;

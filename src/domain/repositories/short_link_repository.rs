//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::page::PageRequest;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short links.
///
/// The store is the authority on key uniqueness and click counting: `create`
/// must reject a duplicate key atomically and `increment_click_count` must be
/// a single atomic update, so concurrent writers never lose an update.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryShortLinkRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_short_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Inserts a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short key is already taken.
    /// Returns [`AppError::NotFound`] if the owner does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its short key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_key(&self, short_key: &str) -> Result<Option<ShortLink>, AppError>;

    /// Checks whether a short key is already assigned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn exists_by_key(&self, short_key: &str) -> Result<bool, AppError>;

    /// Atomically adds one to the click counter and returns the updated link.
    ///
    /// Returns `Ok(None)` if no link has this key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_click_count(&self, short_key: &str)
    -> Result<Option<ShortLink>, AppError>;

    /// Lists public links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_public(&self, page: PageRequest) -> Result<Vec<ShortLink>, AppError>;

    /// Counts public links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count_public(&self) -> Result<i64, AppError>;

    /// Lists every link, public and private, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_all(&self, page: PageRequest) -> Result<Vec<ShortLink>, AppError>;

    /// Counts every link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count_all(&self) -> Result<i64, AppError>;

    /// Lists the links owned by a user, public and private, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_by_owner(
        &self,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Vec<ShortLink>, AppError>;

    /// Counts the links owned by a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count_by_owner(&self, owner_id: i64) -> Result<i64, AppError>;

    /// Deletes the links whose id is in `ids` and whose owner is `owner_id`.
    ///
    /// Links owned by someone else are left untouched. Returns the number of
    /// deleted links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn delete_by_ids_and_owner(&self, ids: &[i64], owner_id: i64) -> Result<u64, AppError>;
}

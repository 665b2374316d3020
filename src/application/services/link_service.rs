//! Short link creation, listing and deletion.

use std::sync::Arc;

use chrono::Duration;
use metrics::counter;
use serde_json::json;
use tracing::{info, warn};

use crate::application::services::KeyGenerator;
use crate::domain::clock::Clock;
use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::page::{Page, PageRequest};
use crate::domain::repositories::{ShortLinkRepository, UserRepository};
use crate::domain::url_validator::UrlValidator;
use crate::error::AppError;

/// Largest accepted `expiration_in_days`.
pub const MAX_EXPIRATION_DAYS: i64 = 3650;

/// Longest accepted original URL, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Tunables the service reads on every creation.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Lifetime given to anonymous links.
    pub default_expiry_days: i64,
    /// How many times an insert is retried after losing a key race.
    pub key_insert_attempts: usize,
    /// Public origin used to build short URLs.
    pub base_url: String,
}

/// A request to shorten a URL.
///
/// `owner_id` is the authenticated requester, never a value chosen by the
/// client. For anonymous requests `is_private` is ignored and a valid
/// `expiration_in_days` is replaced by the default lifetime; an out-of-range
/// value is still rejected.
#[derive(Debug, Clone, Default)]
pub struct CreateShortLink {
    pub original_url: String,
    pub is_private: Option<bool>,
    pub expiration_in_days: Option<i64>,
    pub owner_id: Option<i64>,
}

/// Service for creating and managing short links.
///
/// Anonymous links are always public and always expire after the configured
/// default. Owned links may be private and may never expire.
pub struct LinkService<L, U>
where
    L: ShortLinkRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    link_repository: Arc<L>,
    user_repository: Arc<U>,
    key_generator: Arc<KeyGenerator>,
    url_validator: Option<Arc<dyn UrlValidator>>,
    clock: Arc<dyn Clock>,
    settings: LinkSettings,
}

impl<L, U> LinkService<L, U>
where
    L: ShortLinkRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    /// Creates a new link service.
    pub fn new(
        link_repository: Arc<L>,
        user_repository: Arc<U>,
        key_generator: Arc<KeyGenerator>,
        clock: Arc<dyn Clock>,
        settings: LinkSettings,
    ) -> Self {
        Self {
            link_repository,
            user_repository,
            key_generator,
            url_validator: None,
            clock,
            settings,
        }
    }

    /// Enables the reachability check on original URLs.
    pub fn with_url_validator(mut self, url_validator: Arc<dyn UrlValidator>) -> Self {
        self.url_validator = Some(url_validator);
        self
    }

    /// Creates a short link.
    ///
    /// # Ownership rules
    ///
    /// - Without an owner the link is public and expires `default_expiry_days`
    ///   after creation, whatever the request says.
    /// - With an owner the owner must exist; the link keeps the requested
    ///   privacy and expires `expiration_in_days` after creation, or never.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is blank, too long or holds
    /// control characters, if the expiry is out of range, or if the URL fails
    /// the reachability check.
    /// Returns [`AppError::NotFound`] if the owner does not exist.
    /// Returns [`AppError::Internal`] if no free key could be inserted or on
    /// storage errors.
    pub async fn create_short_link(&self, request: CreateShortLink) -> Result<ShortLink, AppError> {
        let original_url = request.original_url.trim();

        if original_url.is_empty() {
            return Err(AppError::bad_request(
                "Original URL is required",
                json!({ "field": "original_url" }),
            ));
        }

        if original_url.chars().count() > MAX_URL_LENGTH {
            return Err(AppError::bad_request(
                "Original URL must be at most 2048 characters",
                json!({ "field": "original_url", "max_length": MAX_URL_LENGTH }),
            ));
        }

        // Stored URLs end up in a Location header.
        if original_url.chars().any(char::is_control) {
            return Err(AppError::bad_request(
                "Invalid original URL",
                json!({ "field": "original_url", "reason": "control characters" }),
            ));
        }

        if let Some(days) = request.expiration_in_days
            && !(0..=MAX_EXPIRATION_DAYS).contains(&days)
        {
            return Err(AppError::bad_request(
                "Expiration must be between 0 and 3650 days",
                json!({ "expiration_in_days": days }),
            ));
        }

        if let Some(validator) = &self.url_validator
            && !validator.is_reachable(original_url).await
        {
            return Err(AppError::bad_request(
                "Invalid original URL",
                json!({ "original_url": original_url }),
            ));
        }

        let now = self.clock.now();

        let (owner, is_private, expires_at) = match request.owner_id {
            None => (
                None,
                false,
                Some(now + Duration::days(self.settings.default_expiry_days)),
            ),
            Some(owner_id) => {
                let user = self
                    .user_repository
                    .find_by_id(owner_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found("User not found", json!({ "user_id": owner_id }))
                    })?;

                (
                    Some(user.as_owner()),
                    request.is_private.unwrap_or(false),
                    request
                        .expiration_in_days
                        .map(|days| now + Duration::days(days)),
                )
            }
        };

        for attempt in 1..=self.settings.key_insert_attempts {
            let short_key = self
                .key_generator
                .generate_unique_key(self.link_repository.as_ref())
                .await?;

            let new_link = NewShortLink {
                short_key,
                original_url: original_url.to_string(),
                is_private,
                expires_at,
                owner: owner.clone(),
                created_at: now,
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    counter!("short_links_created_total").increment(1);
                    info!(
                        short_key = %link.short_key,
                        owner_id = ?link.owner_id(),
                        is_private = link.is_private,
                        "Short link created"
                    );
                    return Ok(link);
                }
                Err(e) if e.is_conflict() => {
                    counter!("short_key_collisions_total", "stage" => "insert").increment(1);
                    warn!(attempt, "Short key taken between check and insert, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to allocate a unique short key",
            json!({ "attempts": self.settings.key_insert_attempts }),
        ))
    }

    /// Lists public links, newest first.
    ///
    /// Expired public links are still listed; they simply no longer resolve.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_public_links(&self, page: PageRequest) -> Result<Page<ShortLink>, AppError> {
        let (items, total) = tokio::try_join!(
            self.link_repository.list_public(page),
            self.link_repository.count_public()
        )?;

        Ok(Page::new(items, page, total))
    }

    /// Lists every link in the store, private ones included, newest first.
    ///
    /// Meant for operators; no HTTP route exposes it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_all_links(&self, page: PageRequest) -> Result<Page<ShortLink>, AppError> {
        let (items, total) = tokio::try_join!(
            self.link_repository.list_all(page),
            self.link_repository.count_all()
        )?;

        Ok(Page::new(items, page, total))
    }

    /// Lists every link owned by `owner_id`, private ones included.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_user_links(
        &self,
        owner_id: i64,
        page: PageRequest,
    ) -> Result<Page<ShortLink>, AppError> {
        let (items, total) = tokio::try_join!(
            self.link_repository.list_by_owner(owner_id, page),
            self.link_repository.count_by_owner(owner_id)
        )?;

        Ok(Page::new(items, page, total))
    }

    /// Deletes the given links if they belong to `owner_id`.
    ///
    /// Ids that do not exist or belong to someone else are skipped. Returns the
    /// number of links actually removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn delete_user_links(&self, ids: &[i64], owner_id: i64) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let deleted = self
            .link_repository
            .delete_by_ids_and_owner(ids, owner_id)
            .await?;

        info!(owner_id, requested = ids.len(), deleted, "Short links deleted");

        Ok(deleted)
    }

    /// Counts public links. Used as a cheap store round trip by health checks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn count_public_links(&self) -> Result<i64, AppError> {
        self.link_repository.count_public().await
    }

    /// Builds the public URL a short key redirects from.
    pub fn short_url(&self, short_key: &str) -> String {
        format!(
            "{}/s/{}",
            self.settings.base_url.trim_end_matches('/'),
            short_key
        )
    }
}

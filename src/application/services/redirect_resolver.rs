//! Resolution of short keys into their target links.

use std::sync::Arc;

use metrics::counter;
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::entities::ShortLink;
use crate::domain::repositories::ShortLinkRepository;
use crate::domain::short_key;
use crate::error::AppError;

/// Decides whether a short key may be followed right now and counts the click.
///
/// Absent, expired and hidden links all yield `Ok(None)` so callers cannot
/// tell them apart. Expiry is checked before privacy. Only store failures are
/// errors.
pub struct RedirectResolver<L: ShortLinkRepository + ?Sized> {
    link_repository: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L: ShortLinkRepository + ?Sized> RedirectResolver<L> {
    pub fn new(link_repository: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            link_repository,
            clock,
        }
    }

    /// Resolves `short_key` on behalf of `requesting_user_id`.
    ///
    /// On success the click counter has been incremented exactly once and the
    /// returned link carries the new count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn resolve(
        &self,
        short_key: &str,
        requesting_user_id: Option<i64>,
    ) -> Result<Option<ShortLink>, AppError> {
        if !short_key::is_well_formed(short_key) {
            return Ok(Self::miss(short_key, "malformed"));
        }

        let Some(link) = self.link_repository.find_by_key(short_key).await? else {
            return Ok(Self::miss(short_key, "missing"));
        };

        if link.is_expired_at(self.clock.now()) {
            return Ok(Self::miss(short_key, "expired"));
        }

        if !link.is_visible_to(requesting_user_id) {
            return Ok(Self::miss(short_key, "hidden"));
        }

        match self
            .link_repository
            .increment_click_count(short_key)
            .await?
        {
            Some(updated) => {
                counter!("short_link_resolutions_total", "outcome" => "resolved").increment(1);
                debug!(short_key, click_count = updated.click_count, "Short link resolved");
                Ok(Some(updated))
            }
            None => Ok(Self::miss(short_key, "missing")),
        }
    }

    fn miss(short_key: &str, outcome: &'static str) -> Option<ShortLink> {
        counter!("short_link_resolutions_total", "outcome" => outcome).increment(1);
        debug!(short_key, outcome, "Short link not resolved");
        None
    }
}

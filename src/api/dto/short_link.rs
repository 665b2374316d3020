//! DTOs for short link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::link_service::MAX_EXPIRATION_DAYS;
use crate::domain::entities::{Owner, ShortLink};
use crate::state::DynLinkService;

/// Request to shorten a URL.
///
/// The owner is never part of the body; it comes from the identity header.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortLinkRequest {
    /// Length and character checks happen in the link service.
    #[validate(length(min = 1, message = "Original URL is required"))]
    pub original_url: String,

    /// Only honoured for requests made by a known user.
    #[serde(default)]
    pub is_private: Option<bool>,

    /// Only honoured for requests made by a known user; absent means never.
    #[validate(range(min = 0, max = MAX_EXPIRATION_DAYS))]
    #[serde(default)]
    pub expiration_in_days: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerResponse {
    pub id: i64,
    pub name: String,
}

impl From<Owner> for OwnerResponse {
    fn from(owner: Owner) -> Self {
        Self {
            id: owner.id,
            name: owner.name,
        }
    }
}

/// Public view of a short link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortLinkResponse {
    pub id: i64,
    pub short_key: String,
    pub short_url: String,
    pub original_url: String,
    pub is_private: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub owner: Option<OwnerResponse>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLinkResponse {
    pub fn from_link(link: ShortLink, link_service: &DynLinkService) -> Self {
        Self {
            short_url: link_service.short_url(&link.short_key),
            id: link.id,
            short_key: link.short_key,
            original_url: link.original_url,
            is_private: link.is_private,
            expires_at: link.expires_at,
            owner: link.owner.map(Into::into),
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

/// Bulk delete of the caller's own links.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteShortLinksRequest {
    #[validate(length(max = 1000, message = "At most 1000 ids per request"))]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteShortLinksResponse {
    pub deleted: u64,
}

//! ShortLink entity mapping a short key to an original URL.

use chrono::{DateTime, Utc};

/// The user a link belongs to.
///
/// This is a lookup-only reference: links never own or cascade into users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: i64,
    pub name: String,
}

/// A persisted short link with its access metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub id: i64,
    pub short_key: String,
    pub original_url: String,
    pub is_private: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner: Option<Owner>,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Identifier of the owning user, if any.
    pub fn owner_id(&self) -> Option<i64> {
        self.owner.as_ref().map(|o| o.id)
    }

    /// Returns true if the expiry lies strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e < now)
    }

    /// Returns true if `requesting_user_id` may see this link.
    ///
    /// Privacy is only enforced when there is an owner to compare against; an
    /// anonymous requester never matches an owner.
    pub fn is_visible_to(&self, requesting_user_id: Option<i64>) -> bool {
        if !self.is_private {
            return true;
        }

        match self.owner_id() {
            Some(owner_id) => requesting_user_id == Some(owner_id),
            None => true,
        }
    }
}

/// Input data for inserting a new link.
///
/// The store assigns `id` and starts `click_count` at zero.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortLink {
    pub short_key: String,
    pub original_url: String,
    pub is_private: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner: Option<Owner>,
    pub created_at: DateTime<Utc>,
}

impl NewShortLink {
    /// Materializes the record the store will hold once `id` is assigned.
    pub fn into_short_link(self, id: i64) -> ShortLink {
        ShortLink {
            id,
            short_key: self.short_key,
            original_url: self.original_url,
            is_private: self.is_private,
            expires_at: self.expires_at,
            owner: self.owner,
            click_count: 0,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(is_private: bool, owner: Option<i64>, expires_at: Option<DateTime<Utc>>) -> ShortLink {
        ShortLink {
            id: 1,
            short_key: "abc123".to_string(),
            original_url: "https://example.com".to_string(),
            is_private,
            expires_at,
            owner: owner.map(|id| Owner {
                id,
                name: format!("user-{id}"),
            }),
            click_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_never_expires_without_expiry() {
        assert!(!link(false, None, None).is_expired_at(Utc::now()));
    }

    #[test]
    fn test_expired_when_expiry_in_past() {
        let now = Utc::now();
        let link = link(false, None, Some(now - Duration::seconds(1)));
        assert!(link.is_expired_at(now));
    }

    #[test]
    fn test_not_expired_at_exact_expiry() {
        let now = Utc::now();
        let link = link(false, None, Some(now));
        assert!(!link.is_expired_at(now));
    }

    #[test]
    fn test_public_link_visible_to_everyone() {
        let link = link(false, Some(42), None);
        assert!(link.is_visible_to(None));
        assert!(link.is_visible_to(Some(7)));
    }

    #[test]
    fn test_private_link_visible_only_to_owner() {
        let link = link(true, Some(42), None);
        assert!(link.is_visible_to(Some(42)));
        assert!(!link.is_visible_to(Some(7)));
        assert!(!link.is_visible_to(None));
    }

    #[test]
    fn test_private_without_owner_is_visible() {
        let link = link(true, None, None);
        assert!(link.is_visible_to(None));
        assert!(link.is_visible_to(Some(7)));
    }

    #[test]
    fn test_new_short_link_starts_with_zero_clicks() {
        let created_at = Utc::now();
        let new_link = NewShortLink {
            short_key: "xyz789".to_string(),
            original_url: "https://rust-lang.org".to_string(),
            is_private: false,
            expires_at: None,
            owner: None,
            created_at,
        };

        let link = new_link.into_short_link(9);

        assert_eq!(link.id, 9);
        assert_eq!(link.short_key, "xyz789");
        assert_eq!(link.click_count, 0);
        assert_eq!(link.created_at, created_at);
        assert_eq!(link.owner_id(), None);
    }
}

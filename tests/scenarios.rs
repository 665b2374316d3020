mod common;

use chrono::Duration;
use short_url::domain::repositories::ShortLinkRepository;
use short_url::domain::short_key::{ALPHABET, SHORT_KEY_LENGTH};
use short_url::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

#[tokio::test]
async fn test_anonymous_link_defaults() {
    let (state, _clock, _links, _users) = common::create_test_state();

    let link = state
        .link_service
        .create_short_link(CreateShortLink {
            original_url: "https://example.com".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(!link.is_private);
    assert_eq!(
        link.expires_at,
        Some(common::start_time() + Duration::days(common::DEFAULT_EXPIRY_DAYS))
    );
    assert_eq!(link.click_count, 0);
    assert!(link.owner.is_none());
}

#[tokio::test]
async fn test_private_link_resolves_only_for_owner() {
    let (state, _clock, links, users) = common::create_test_state();
    common::create_user_with_id(users.as_ref(), 7).await;
    common::create_user_with_id(users.as_ref(), 42).await;

    let link = state
        .link_service
        .create_short_link(CreateShortLink {
            original_url: "https://example.com/secret".to_string(),
            is_private: Some(true),
            expiration_in_days: Some(1),
            owner_id: Some(42),
        })
        .await
        .unwrap();

    let resolved = state
        .redirect_resolver
        .resolve(&link.short_key, Some(42))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.click_count, 1);

    let hidden = state
        .redirect_resolver
        .resolve(&link.short_key, Some(7))
        .await
        .unwrap();
    assert!(hidden.is_none());

    let anonymous = state
        .redirect_resolver
        .resolve(&link.short_key, None)
        .await
        .unwrap();
    assert!(anonymous.is_none());

    let stored = links.find_by_key(&link.short_key).await.unwrap().unwrap();
    assert_eq!(stored.click_count, 1);
}

#[tokio::test]
async fn test_zero_day_expiry_expires_immediately() {
    let (state, clock, links, users) = common::create_test_state();
    let user = common::create_user(users.as_ref(), "Ada").await;

    let link = state
        .link_service
        .create_short_link(CreateShortLink {
            original_url: "https://example.com".to_string(),
            expiration_in_days: Some(0),
            owner_id: Some(user.id),
            ..Default::default()
        })
        .await
        .unwrap();

    clock.advance(Duration::milliseconds(1));

    let resolved = state
        .redirect_resolver
        .resolve(&link.short_key, Some(user.id))
        .await
        .unwrap();
    assert!(resolved.is_none());

    let stored = links.find_by_key(&link.short_key).await.unwrap().unwrap();
    assert_eq!(stored.click_count, 0);
}

#[tokio::test]
async fn test_sequential_resolutions_count_exactly() {
    let (state, _clock, _links, _users) = common::create_test_state();

    let link = state
        .link_service
        .create_short_link(CreateShortLink {
            original_url: "https://example.com".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    for expected in 1..=25 {
        let resolved = state
            .redirect_resolver
            .resolve(&link.short_key, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(resolved.click_count, expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolutions_count_exactly() {
    let (state, _clock, links, _users) = common::create_test_state();

    let link = state
        .link_service
        .create_short_link(CreateShortLink {
            original_url: "https://example.com".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let resolver = state.redirect_resolver.clone();
    let mut handles = Vec::new();
    for _ in 0..200 {
        let resolver = Arc::clone(&resolver);
        let key = link.short_key.clone();
        handles.push(tokio::spawn(async move {
            resolver.resolve(&key, None).await.unwrap().is_some()
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap());
    }

    let stored = links.find_by_key(&link.short_key).await.unwrap().unwrap();
    assert_eq!(stored.click_count, 200);
}

#[tokio::test]
async fn test_generated_keys_are_unique_and_well_formed() {
    let (state, _clock, _links, _users) = common::create_test_state();
    let mut keys = HashSet::new();

    for i in 0..500 {
        let link = state
            .link_service
            .create_short_link(CreateShortLink {
                original_url: format!("https://example.com/{i}"),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(link.short_key.len(), SHORT_KEY_LENGTH);
        assert!(link.short_key.bytes().all(|b| ALPHABET.contains(&b)));
        assert!(keys.insert(link.short_key));
    }
}

#[tokio::test]
async fn test_public_listing_excludes_private_links() {
    let (state, clock, _links, users) = common::create_test_state();
    let user = common::create_user(users.as_ref(), "Ada").await;

    for (i, is_private) in [false, true, false, true, false].into_iter().enumerate() {
        clock.advance(Duration::seconds(1));
        state
            .link_service
            .create_short_link(CreateShortLink {
                original_url: format!("https://example.com/{i}"),
                is_private: Some(is_private),
                owner_id: Some(user.id),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let page = state
        .link_service
        .list_public_links(PageRequest::new(1, 10))
        .await
        .unwrap();

    assert_eq!(page.total_elements, 3);
    assert!(page.items.iter().all(|link| !link.is_private));
    assert!(
        page.items
            .windows(2)
            .all(|pair| pair[0].created_at > pair[1].created_at)
    );
    assert_eq!(page.items[0].original_url, "https://example.com/4");
}

mod common;

use chrono::Duration;
use serde_json::{Value, json};
use short_url::api::dto::short_link::ShortLinkResponse;
use short_url::domain::repositories::ShortLinkRepository;

#[tokio::test]
async fn test_redirect_success() {
    let app = common::spawn_app();
    common::insert_link(app.links.as_ref(), "abc123", None, false, common::start_time()).await;

    let response = app.server.get("/s/abc123").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(response.header("location"), "https://example.com/abc123");

    let link = app.links.find_by_key("abc123").await.unwrap().unwrap();
    assert_eq!(link.click_count, 1);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = common::spawn_app();

    let response = app.server.get("/s/zzzzzz").await;

    assert_eq!(response.status_code(), 404);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["details"]["short_key"], "zzzzzz");
}

#[tokio::test]
async fn test_redirect_malformed_key() {
    let app = common::spawn_app();
    common::insert_link(app.links.as_ref(), "abc123", None, false, common::start_time()).await;

    let response = app.server.get("/s/abc12").await;
    assert_eq!(response.status_code(), 404);

    let response = app.server.get("/s/abc-12").await;
    assert_eq!(response.status_code(), 404);

    let link = app.links.find_by_key("abc123").await.unwrap().unwrap();
    assert_eq!(link.click_count, 0);
}

#[tokio::test]
async fn test_redirect_private_link_owner_only() {
    let app = common::spawn_app();
    let stranger = common::create_user_with_id(app.users.as_ref(), 7).await;
    let owner = common::create_user_with_id(app.users.as_ref(), 42).await;
    common::insert_link(
        app.links.as_ref(),
        "Priv42",
        Some(&owner),
        true,
        common::start_time(),
    )
    .await;

    let response = app
        .server
        .get("/s/Priv42")
        .add_header("X-User-Id", stranger.id.to_string())
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app.server.get("/s/Priv42").await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .server
        .get("/s/Priv42")
        .add_header("X-User-Id", owner.id.to_string())
        .await;
    assert_eq!(response.status_code(), 307);

    let link = app.links.find_by_key("Priv42").await.unwrap().unwrap();
    assert_eq!(link.click_count, 1);
}

#[tokio::test]
async fn test_redirect_expired_link() {
    let app = common::spawn_app();
    let user = common::create_user(app.users.as_ref(), "Ada").await;

    let response = app
        .server
        .post("/api/short-links")
        .add_header("X-User-Id", user.id.to_string())
        .json(&json!({ "original_url": "https://example.com", "expiration_in_days": 1 }))
        .await;
    let created: ShortLinkResponse = response.json();
    let path = format!("/s/{}", created.short_key);

    app.clock.advance(Duration::days(1));
    assert_eq!(app.server.get(&path).await.status_code(), 307);

    app.clock.advance(Duration::seconds(1));
    assert_eq!(app.server.get(&path).await.status_code(), 404);
}

#[tokio::test]
async fn test_resolve_returns_link_json() {
    let app = common::spawn_app();
    common::insert_link(app.links.as_ref(), "Json01", None, false, common::start_time()).await;

    let response = app.server.get("/api/short-links/Json01").await;

    assert_eq!(response.status_code(), 200);

    let body: ShortLinkResponse = response.json();
    assert_eq!(body.short_key, "Json01");
    assert_eq!(body.original_url, "https://example.com/Json01");
    assert_eq!(body.click_count, 1);
}

#[tokio::test]
async fn test_resolve_private_link_hidden_from_others() {
    let app = common::spawn_app();
    let stranger = common::create_user(app.users.as_ref(), "Bob").await;
    let owner = common::create_user(app.users.as_ref(), "Ada").await;
    common::insert_link(
        app.links.as_ref(),
        "Hidden",
        Some(&owner),
        true,
        common::start_time(),
    )
    .await;

    let response = app
        .server
        .get("/api/short-links/Hidden")
        .add_header("X-User-Id", stranger.id.to_string())
        .await;
    assert_eq!(response.status_code(), 404);

    let response = app
        .server
        .get("/api/short-links/Hidden")
        .add_header("X-User-Id", owner.id.to_string())
        .await;
    assert_eq!(response.status_code(), 200);

    let body: ShortLinkResponse = response.json();
    assert_eq!(body.owner.unwrap().name, "Ada");
}

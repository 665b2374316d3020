//! Handlers for short link endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::short_link::{
    CreateShortLinkRequest, DeleteShortLinksRequest, DeleteShortLinksResponse, ShortLinkResponse,
};
use crate::api::extract::{AuthenticatedUser, RequestingUser};
use crate::application::services::CreateShortLink;
use crate::domain::page::Page;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/short-links`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/some/long/path",
///   "is_private": true,          // optional, owners only
///   "expiration_in_days": 7      // optional, owners only
/// }
/// ```
///
/// Without an `X-User-Id` header the link is public and expires after the
/// configured default, whatever the body says.
///
/// # Errors
///
/// Returns 400 Bad Request if the body is invalid or the URL is rejected.
/// Returns 404 Not Found if the `X-User-Id` user does not exist.
pub async fn create_short_link_handler(
    State(state): State<AppState>,
    RequestingUser(owner_id): RequestingUser,
    Json(payload): Json<CreateShortLinkRequest>,
) -> Result<(StatusCode, Json<ShortLinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(CreateShortLink {
            original_url: payload.original_url,
            is_private: payload.is_private,
            expiration_in_days: payload.expiration_in_days,
            owner_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ShortLinkResponse::from_link(link, &state.link_service)),
    ))
}

/// Lists public links, newest first.
///
/// # Endpoint
///
/// `GET /api/short-links?page=1&page_size=10`
pub async fn list_public_links_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<ShortLinkResponse>>, AppError> {
    let page = params.to_page_request(state.default_page_size)?;

    let links = state.link_service.list_public_links(page).await?;

    Ok(Json(links.map(|link| {
        ShortLinkResponse::from_link(link, &state.link_service)
    })))
}

/// Resolves a short key and returns the link instead of redirecting.
///
/// Counts as a click, exactly like following the short URL.
///
/// # Endpoint
///
/// `GET /api/short-links/{short_key}`
///
/// # Errors
///
/// Returns 404 Not Found if the key is unknown, expired or private to
/// someone else.
pub async fn resolve_short_link_handler(
    State(state): State<AppState>,
    Path(short_key): Path<String>,
    RequestingUser(user_id): RequestingUser,
) -> Result<Json<ShortLinkResponse>, AppError> {
    let link = state
        .redirect_resolver
        .resolve(&short_key, user_id)
        .await?
        .ok_or_else(|| short_link_not_found(&short_key))?;

    Ok(Json(ShortLinkResponse::from_link(link, &state.link_service)))
}

/// Lists the caller's own links, private ones included.
///
/// # Endpoint
///
/// `GET /api/me/short-links?page=1&page_size=10`
///
/// # Errors
///
/// Returns 401 Unauthorized without an `X-User-Id` header.
pub async fn list_my_links_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Page<ShortLinkResponse>>, AppError> {
    let page = params.to_page_request(state.default_page_size)?;

    let links = state.link_service.list_user_links(user_id, page).await?;

    Ok(Json(links.map(|link| {
        ShortLinkResponse::from_link(link, &state.link_service)
    })))
}

/// Deletes some of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/me/short-links`
///
/// # Request Body
///
/// ```json
/// { "ids": [1, 2, 3] }
/// ```
///
/// Ids belonging to other users are ignored; the response reports how many
/// links were actually removed.
pub async fn delete_my_links_handler(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(payload): Json<DeleteShortLinksRequest>,
) -> Result<Json<DeleteShortLinksResponse>, AppError> {
    payload.validate()?;

    let deleted = state
        .link_service
        .delete_user_links(&payload.ids, user_id)
        .await?;

    Ok(Json(DeleteShortLinksResponse { deleted }))
}

pub(crate) fn short_link_not_found(short_key: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "short_key": short_key }))
}

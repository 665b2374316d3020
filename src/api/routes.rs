//! API route configuration.
//!
//! Identity is read per request from the `X-User-Id` header; owner-scoped
//! routes reject anonymous callers through
//! [`crate::api::extract::AuthenticatedUser`].

use crate::api::handlers::{
    create_short_link_handler, delete_my_links_handler, list_my_links_handler,
    list_public_links_handler, resolve_short_link_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// JSON API routes, mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /short-links`             - Create a short link
/// - `GET    /short-links`             - List public links (paginated)
/// - `GET    /short-links/{short_key}` - Resolve a link as JSON (counts a click)
/// - `GET    /me/short-links`          - List the caller's links (paginated)
/// - `DELETE /me/short-links`          - Delete some of the caller's links
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/short-links",
            get(list_public_links_handler).post(create_short_link_handler),
        )
        .route("/short-links/{short_key}", get(resolve_short_link_handler))
        .route(
            "/me/short-links",
            get(list_my_links_handler).delete(delete_my_links_handler),
        )
}

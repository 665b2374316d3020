//! Top-level router configuration combining API and redirect routes.
//!
//! # Route Structure
//!
//! - `GET  /s/{short_key}` - Short link redirect
//! - `GET  /health`        - Health check
//! - `/api/*`              - JSON API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes without rate limiting or connection-level middleware.
///
/// Integration tests drive this router directly since they have no peer
/// address for the rate limiter to key on.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/s/{short_key}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
}

/// Constructs the application router with all routes and middleware.
///
/// Must be served with `into_make_service_with_connect_info::<SocketAddr>`
/// so the rate limiter can read the peer address.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let redirects = Router::new()
        .route("/s/{short_key}", get(redirect_handler))
        .layer(rate_limit::redirect_layer());

    let api_router = api::routes::api_routes().layer(rate_limit::api_layer());

    let router = Router::new()
        .merge(redirects)
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

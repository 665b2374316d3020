//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::api::extract::RequestingUser;
use crate::api::handlers::short_links::short_link_not_found;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its original URL.
///
/// # Endpoint
///
/// `GET /s/{short_key}`
///
/// # Request Flow
///
/// 1. Look the key up
/// 2. Reject it if expired
/// 3. Reject it if private and the `X-User-Id` caller is not the owner
/// 4. Count the click
/// 5. Return 307 Temporary Redirect
///
/// # Errors
///
/// Returns 404 Not Found for unknown, expired and hidden links alike.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_key): Path<String>,
    RequestingUser(user_id): RequestingUser,
) -> Result<Redirect, AppError> {
    let link = state
        .redirect_resolver
        .resolve(&short_key, user_id)
        .await?
        .ok_or_else(|| short_link_not_found(&short_key))?;

    Ok(Redirect::temporary(&link.original_url))
}

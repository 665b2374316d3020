//! Request identity extractors.
//!
//! Authentication happens upstream; this service only reads the numeric user
//! id the identity provider forwards in the `X-User-Id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde_json::json;

use crate::error::AppError;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The requesting user, if any.
///
/// A missing header means an anonymous request. A header that is present but
/// not a positive integer is rejected with `400 Bad Request`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestingUser(pub Option<i64>);

impl<S: Send + Sync> FromRequestParts<S> for RequestingUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Self(None));
        };

        let user_id = value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| {
                AppError::bad_request(
                    "Invalid user id header",
                    json!({ "header": USER_ID_HEADER }),
                )
            })?;

        Ok(Self(Some(user_id)))
    }
}

/// A requesting user that must be known.
///
/// Rejects anonymous requests with `401 Unauthorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match RequestingUser::from_request_parts(parts, state).await? {
            RequestingUser(Some(user_id)) => Ok(Self(user_id)),
            RequestingUser(None) => Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "X-User-Id header is missing" }),
            )),
        }
    }
}

//! Bearer-token authentication.
//!
//! Every `/clients` route requires `Authorization: Bearer <token>`; the
//! token is resolved to a user through the store. A missing, malformed,
//! or unknown token yields [`ApiError::Unauthenticated`] before any
//! handler logic runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};

use clientdesk_core::Actor;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor for the authenticated user behind the request token.
pub struct AuthUser(pub Actor);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthenticated)?;
        let actor = state
            .store()
            .actor_by_token(token)
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        tracing::debug!(user_id = %actor.id, "request authenticated");
        Ok(Self(actor))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use cookiejar_core::error::CoreError;
use cookiejar_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

/// Viewer identity for endpoints that also serve anonymous callers.
///
/// A missing `Authorization` header yields `None`. A header that is present
/// but invalid is still rejected with 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<DbId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

fn authenticate(header: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

    let claims = validate_token(token, &state.config.jwt)
        .map_err(|_| unauthorized("Invalid or expired token"))?;

    Ok(AuthUser {
        user_id: claims.sub,
    })
}

/// The raw `Authorization` header. `Ok(None)` only when the header is
/// absent; a value that is not visible ASCII is rejected.
fn authorization_header(parts: &Parts) -> Result<Option<&str>, AppError> {
    match parts.headers.get(header::AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map(Some)
            .map_err(|_| unauthorized("Malformed Authorization header")),
        None => Ok(None),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = authorization_header(parts)?
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;
        authenticate(header, state)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match authorization_header(parts)? {
            Some(header) => Ok(MaybeAuthUser(Some(authenticate(header, state)?))),
            None => Ok(MaybeAuthUser(None)),
        }
    }
}

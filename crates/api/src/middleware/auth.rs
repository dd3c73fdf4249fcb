//! Session extractors for Axum handlers.
//!
//! Tokens only establish *who* the caller is. What they may see or change
//! is decided by the access layer from the stored profile on every request,
//! so no role is read from the token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rigel_access::session::Session;
use rigel_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated session; rejects with 401 when no valid token is sent.
///
/// ```ignore
/// async fn my_handler(AuthSession(session): AuthSession) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %session.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

/// Optional session for routes anonymous visitors may use.
///
/// No `Authorization` header yields `Viewer(None)`. A header that is present
/// but malformed or carries an invalid token is still rejected with 401
/// rather than silently downgraded to a visitor.
#[derive(Debug, Clone)]
pub struct Viewer(pub Option<Session>);

impl Viewer {
    pub fn session(&self) -> Option<&Session> {
        self.0.as_ref()
    }
}

fn session_from_header(header: &str, state: &AppState) -> Result<Session, AppError> {
    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::AuthRequired(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })?;

    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::AuthRequired("Invalid or expired token".into()))
    })?;

    Ok(Session::from(claims))
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::AuthRequired(
                    "Missing Authorization header".into(),
                ))
            })?;

        Ok(AuthSession(session_from_header(header, state)?))
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.headers.get("authorization") {
            None => Ok(Viewer(None)),
            Some(value) => {
                let header = value.to_str().map_err(|_| {
                    AppError::Core(CoreError::AuthRequired(
                        "Malformed Authorization header".into(),
                    ))
                })?;
                Ok(Viewer(Some(session_from_header(header, state)?)))
            }
        }
    }
}

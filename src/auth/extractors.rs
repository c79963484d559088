use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::cookies::{extract_token, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::{error::AppError, state::AppState};

/// Id of the user behind a valid access token, taken from the
/// `Authorization` header or the `access_token` cookie.
pub struct AuthUser(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers, ACCESS_COOKIE)
            .ok_or(AppError::Unauthorized("Missing access token"))?;
        let user_id = state.sessions.authorize(&token).await?;
        // Fills the `user_id` field of the per-request trace span.
        tracing::Span::current().record("user_id", user_id);
        Ok(AuthUser(user_id))
    }
}

/// Raw refresh token, if the request carries one. Validation happens in
/// `SessionManager::refresh` so every failure is reported the same way.
pub struct RefreshToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for RefreshToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RefreshToken(extract_token(&parts.headers, REFRESH_COOKIE)))
    }
}

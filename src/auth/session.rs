use std::sync::Arc;

use anyhow::Context;
use tracing::{info, instrument, warn};

use super::{
    claims::TokenKind,
    cookies::{CookieChange, SessionCookies},
    jwt::TokenCodec,
    password::verify_password,
    repo_types::PublicUser,
};
use crate::{error::AppError, store::UserStore};

/// Tokens handed out by a successful login.
#[derive(Debug)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Login, refresh, logout and per-request authorization. Holds no session
/// table: every token carries its own validity.
pub struct SessionManager {
    store: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl SessionManager {
    pub fn new(store: Arc<dyn UserStore>, codec: Arc<TokenCodec>) -> Self {
        Self { store, codec }
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AppError> {
        let email = normalize_email(email);

        let user = match self.store.find_user_by_email(&email).await? {
            Some(u) => u,
            None => {
                warn!(%email, "login unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash) {
            warn!(%email, user_id = user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let subject = user.id.to_string();
        let access_token = self.codec.issue(&subject, TokenKind::Access)?;
        let refresh_token = self.codec.issue(&subject, TokenKind::Refresh)?;

        info!(user_id = user.id, "user logged in");
        Ok(IssuedSession {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }

    /// Resolves an access token to the id of a user that still exists.
    pub async fn authorize(&self, access_token: &str) -> Result<i64, AppError> {
        let subject = self
            .codec
            .verify(access_token, TokenKind::Access)
            .map_err(|e| {
                warn!(error = %e, "access token rejected");
                AppError::Unauthorized("Invalid or expired token")
            })?;
        let user_id = subject
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid or expired token"))?;

        // Looked up on every call so a deleted account loses access at once.
        match self.store.find_user_by_id(user_id).await? {
            Some(_) => Ok(user_id),
            None => {
                warn!(user_id, "token subject no longer exists");
                Err(AppError::Unauthorized("User account no longer exists"))
            }
        }
    }

    /// Mints a fresh access token. The refresh token itself is not rotated.
    /// All failures collapse into `RefreshFailed` with the cause chained.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        self.try_refresh(refresh_token)
            .await
            .map_err(AppError::RefreshFailed)
    }

    async fn try_refresh(&self, refresh_token: &str) -> anyhow::Result<String> {
        let subject = self
            .codec
            .verify(refresh_token, TokenKind::Refresh)
            .context("refresh token rejected")?;
        let user_id = subject
            .parse::<i64>()
            .context("refresh token subject is not a user id")?;

        self.store
            .find_user_by_id(user_id)
            .await
            .context("user lookup failed")?
            .with_context(|| format!("user {user_id} no longer exists"))?;

        let access_token = self.codec.issue(&subject, TokenKind::Access)?;
        info!(user_id, "access token refreshed");
        Ok(access_token)
    }

    /// Unauthenticated and unconditional: always asks for both cookies to go.
    pub fn logout(&self) -> SessionCookies {
        SessionCookies::cleared()
    }

    pub fn login_cookies(&self, session: &IssuedSession) -> SessionCookies {
        SessionCookies {
            access: CookieChange::Set {
                value: session.access_token.clone(),
                max_age: self.codec.lifetime(TokenKind::Access),
            },
            refresh: CookieChange::Set {
                value: session.refresh_token.clone(),
                max_age: self.codec.lifetime(TokenKind::Refresh),
            },
        }
    }

    pub fn refresh_cookies(&self, access_token: &str) -> SessionCookies {
        SessionCookies {
            access: CookieChange::Set {
                value: access_token.to_owned(),
                max_age: self.codec.lifetime(TokenKind::Access),
            },
            refresh: CookieChange::Keep,
        }
    }
}

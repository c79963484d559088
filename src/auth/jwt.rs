use std::sync::Arc;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::{Claims, TokenKind};
use crate::config::JwtConfig;

/// Source of "now" for issuing and expiring tokens.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("bad token signature")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("wrong token kind")]
    WrongKind,
}

/// Signs and verifies HS256 tokens. Built once at startup and shared.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(cfg: &JwtConfig, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        if cfg.secret.is_empty() {
            anyhow::bail!("jwt secret must not be empty");
        }
        if cfg.access_ttl_minutes <= 0 || cfg.refresh_ttl_minutes <= 0 {
            anyhow::bail!("token lifetimes must be positive");
        }

        // Expiry is checked against the injected clock after the kind check.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.set_issuer(std::slice::from_ref(&cfg.issuer));
        validation.set_audience(std::slice::from_ref(&cfg.audience));

        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::minutes(cfg.access_ttl_minutes),
            refresh_ttl: Duration::minutes(cfg.refresh_ttl_minutes),
            clock,
        })
    }

    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    pub fn issue(&self, subject: &str, kind: TokenKind) -> anyhow::Result<String> {
        let now = self.clock.now();
        let exp = now + self.lifetime(kind);
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4().to_string(),
            kind,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(subject, kind = ?kind, "jwt signed");
        Ok(token)
    }

    /// Verifies structure, then signature, then kind, then expiry, and
    /// returns the subject.
    pub fn verify(&self, token: &str, required: TokenKind) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            }
        })?;
        let claims = data.claims;

        if claims.kind != required {
            return Err(TokenError::WrongKind);
        }
        if self.clock.now().unix_timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        debug!(subject = %claims.sub, kind = ?claims.kind, "jwt verified");
        Ok(claims.sub)
    }
}

use anyhow::{bail, Context};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Mark session cookies `Secure`. Off unless explicitly enabled.
    pub cookie_secure: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; `from_env` feeds it the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));
        let minutes = |key: &str| -> anyhow::Result<i64> {
            let raw = required(key)?;
            let value = raw
                .trim()
                .parse::<i64>()
                .with_context(|| format!("{key} must be an integer number of minutes"))?;
            if value <= 0 {
                bail!("{key} must be positive, got {value}");
            }
            Ok(value)
        };

        let secret = required("JWT_SECRET_KEY")?;
        if secret.is_empty() {
            bail!("JWT_SECRET_KEY must not be empty");
        }

        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "influencer-api".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "influencer-api-users".into()),
            access_ttl_minutes: minutes("ACCESS_TOKEN_EXPIRES_IN")?,
            refresh_ttl_minutes: minutes("REFRESH_TOKEN_EXPIRES_IN")?,
        };

        let cookie_secure = lookup("COOKIE_SECURE")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url: required("DB_URL")?,
            jwt,
            cookie_secure,
        })
    }
}

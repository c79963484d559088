//! Session cookie rendering and extraction.

use axum::http::{header, HeaderMap};
use time::Duration;

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Attributes shared by every session cookie the service writes.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub secure: bool,
    pub path: String,
}

impl CookiePolicy {
    pub fn new(secure: bool) -> Self {
        Self {
            secure,
            path: "/".to_string(),
        }
    }

    pub fn build_set_cookie(&self, name: &str, value: &str, max_age: Duration) -> String {
        // Session cookies are always HttpOnly and SameSite=Lax.
        let mut cookie = format!("{}={}; HttpOnly", name, value);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite=Lax; Path={}", self.path));
        cookie.push_str(&format!("; Max-Age={}", max_age.whole_seconds()));

        cookie
    }

    /// Set-Cookie value that makes the browser drop the cookie immediately.
    pub fn build_delete_cookie(&self, name: &str) -> String {
        self.build_set_cookie(name, "", Duration::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieChange {
    Keep,
    Set { value: String, max_age: Duration },
    Clear,
}

/// What the HTTP layer must do with the two session cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookies {
    pub access: CookieChange,
    pub refresh: CookieChange,
}

impl SessionCookies {
    pub fn cleared() -> Self {
        Self {
            access: CookieChange::Clear,
            refresh: CookieChange::Clear,
        }
    }

    /// Renders one `Set-Cookie` value per changed cookie.
    pub fn render(&self, policy: &CookiePolicy) -> Vec<String> {
        [(ACCESS_COOKIE, &self.access), (REFRESH_COOKIE, &self.refresh)]
            .into_iter()
            .filter_map(|(name, change)| match change {
                CookieChange::Keep => None,
                CookieChange::Set { value, max_age } => {
                    Some(policy.build_set_cookie(name, value, *max_age))
                }
                CookieChange::Clear => Some(policy.build_delete_cookie(name)),
            })
            .collect()
    }
}

/// Extract a cookie value from headers
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

/// Token from `Authorization: Bearer ...`, falling back to the named cookie.
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| {
            auth.strip_prefix("Bearer ")
                .or_else(|| auth.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned);

    bearer.or_else(|| extract_cookie(headers, cookie_name))
}

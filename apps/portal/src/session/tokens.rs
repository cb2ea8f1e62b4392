use std::fmt;

use time::Duration;
use tracing::debug;

use super::cookies::{Cookie, CookieStore};
use crate::error::ClientError;

pub const ACCESS_TOKEN_COOKIE: &str = "authToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Both session tokens live for 30 days.
pub const TOKEN_MAX_AGE: Duration = Duration::days(30);

#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// Current access token, if one is stored.
pub fn access_token(store: &dyn CookieStore) -> Result<Option<String>, ClientError> {
    store.value(ACCESS_TOKEN_COOKIE)
}

/// Both tokens, or `None` when either one is missing.
pub fn load(store: &dyn CookieStore) -> Result<Option<TokenPair>, ClientError> {
    let access = store.value(ACCESS_TOKEN_COOKIE)?;
    let refresh = store.value(REFRESH_TOKEN_COOKIE)?;
    Ok(match (access, refresh) {
        (Some(access), Some(refresh)) => Some(TokenPair { access, refresh }),
        _ => None,
    })
}

pub fn store(store: &dyn CookieStore, pair: &TokenPair) -> Result<(), ClientError> {
    store.set(Cookie::new(ACCESS_TOKEN_COOKIE, &pair.access, TOKEN_MAX_AGE))?;
    store.set(Cookie::new(REFRESH_TOKEN_COOKIE, &pair.refresh, TOKEN_MAX_AGE).http_only())?;
    debug!("session tokens stored");
    Ok(())
}

pub fn clear(store: &dyn CookieStore) -> Result<(), ClientError> {
    store.remove(ACCESS_TOKEN_COOKIE)?;
    store.remove(REFRESH_TOKEN_COOKIE)?;
    debug!("session tokens cleared");
    Ok(())
}

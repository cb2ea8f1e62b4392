//! Client configuration loaded from `PORTAL_*` environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ClientError;
use crate::errors::validation::http_url;
use crate::http::retry::RetryPolicy;

pub const API_BASE_URL_VAR: &str = "PORTAL_API_BASE_URL";
pub const HTTP_TIMEOUT_VAR: &str = "PORTAL_HTTP_TIMEOUT_SECS";
pub const SESSION_STALE_VAR: &str = "PORTAL_SESSION_STALE_SECS";
pub const RETRY_ATTEMPTS_VAR: &str = "PORTAL_RETRY_ATTEMPTS";
pub const RETRY_BASE_MS_VAR: &str = "PORTAL_RETRY_BASE_MS";
pub const SESSION_FILE_VAR: &str = "PORTAL_SESSION_FILE";

pub const DEFAULT_SESSION_FILE: &str = ".portal-session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub http_timeout: Duration,
    /// How long a cached session or project list counts as fresh.
    pub session_stale_time: Duration,
    pub retry: RetryPolicy,
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Defaults for everything except the base URL.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            http_timeout: Duration::from_secs(30),
            session_stale_time: Duration::from_secs(300),
            retry: RetryPolicy::default(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }

    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = must_var(API_BASE_URL_VAR)?;
        http_url(API_BASE_URL_VAR, &base_url)
            .map_err(|e| ClientError::config(format!("{API_BASE_URL_VAR}: {}", e.message)))?;

        let mut config = Self::new(base_url);

        if let Some(secs) = parse_env::<u64>(HTTP_TIMEOUT_VAR)? {
            if secs == 0 {
                return Err(ClientError::config(format!("{HTTP_TIMEOUT_VAR} must be positive")));
            }
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_env::<u64>(SESSION_STALE_VAR)? {
            config.session_stale_time = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_env::<u32>(RETRY_ATTEMPTS_VAR)? {
            config.retry.retries = retries;
        }
        if let Some(ms) = parse_env::<u64>(RETRY_BASE_MS_VAR)? {
            config.retry.base_delay = Duration::from_millis(ms);
        }
        if let Some(path) = env::var(SESSION_FILE_VAR).ok().filter(|v| !v.trim().is_empty()) {
            config.session_file = PathBuf::from(path);
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_session_stale_time(mut self, stale: Duration) -> Self {
        self.session_stale_time = stale;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }
}

fn must_var(name: &str) -> Result<String, ClientError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ClientError::config(format!("Required environment variable '{name}' is not set")))
}

/// Unset or blank → `None`; unparsable → config error naming the variable.
fn parse_env<T>(name: &str) -> Result<Option<T>, ClientError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ClientError::config(format!("{name}: invalid value '{raw}': {e}"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let cfg = ClientConfig::new("http://localhost:8080/api/v1/");
        assert_eq!(cfg.api_base_url, "http://localhost:8080/api/v1");
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
        assert_eq!(cfg.session_stale_time, Duration::from_secs(300));
        assert_eq!(cfg.retry, RetryPolicy::default());
        assert_eq!(cfg.session_file, PathBuf::from(".portal-session.json"));
    }

    #[test]
    fn builders_override() {
        let cfg = ClientConfig::new("http://x")
            .with_timeout(Duration::from_secs(2))
            .with_retry(RetryPolicy::none())
            .with_session_stale_time(Duration::ZERO);
        assert_eq!(cfg.http_timeout, Duration::from_secs(2));
        assert_eq!(cfg.retry.retries, 0);
        assert_eq!(cfg.session_stale_time, Duration::ZERO);
    }
}

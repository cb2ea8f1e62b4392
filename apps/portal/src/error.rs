use std::collections::HashMap;

use thiserror::Error;

use crate::auth::permissions::Permission;
use crate::errors::{ResponseCode, ValidationError};

/// Fallback message when the envelope reports a failure without text.
pub const DEFAULT_API_ERROR_MESSAGE: &str = "An API error occurred.";

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure carrying only the HTTP status.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    /// The envelope `code` was not `Success`.
    #[error("{message}")]
    Api {
        code: ResponseCode,
        message: String,
        codes: HashMap<String, i64>,
        status: u16,
    },
    #[error("Session expired. Please log in again.")]
    SessionExpired,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Decode error: {detail}")]
    Decode { detail: String },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Missing permission: {permission}")]
    PermissionDenied { permission: Permission },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Storage error: {detail}")]
    Storage { detail: String },
}

impl ClientError {
    pub fn decode(detail: impl Into<String>) -> Self {
        Self::Decode {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn storage(detail: impl Into<String>) -> Self {
        Self::Storage {
            detail: detail.into(),
        }
    }

    pub fn api(code: ResponseCode, message: impl Into<String>, status: u16) -> Self {
        Self::Api {
            code,
            message: message.into(),
            codes: HashMap::new(),
            status,
        }
    }

    /// HTTP status associated with this error, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status } | ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Envelope code for application errors.
    pub fn response_code(&self) -> Option<ResponseCode> {
        match self {
            ClientError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Field-level sub-codes reported alongside an application error.
    pub fn field_codes(&self) -> Option<&HashMap<String, i64>> {
        match self {
            ClientError::Api { codes, .. } => Some(codes),
            _ => None,
        }
    }

    /// Only transport 5xx responses qualify for backoff retries.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ClientError::Http { status } if *status >= 500)
    }

    /// True when the user has to sign in again before continuing.
    pub fn requires_login(&self) -> bool {
        match self {
            ClientError::SessionExpired => true,
            ClientError::Http { status } => *status == 401,
            ClientError::Api { code, .. } => *code == ResponseCode::Unauthenticated,
            _ => false,
        }
    }

    /// Session lookups give up immediately on these instead of retrying.
    pub fn is_terminal_for_session(&self) -> bool {
        match self {
            ClientError::Decode { .. } => true,
            ClientError::Api { code, .. } => matches!(
                code,
                ResponseCode::Unauthorized | ResponseCode::Forbidden | ResponseCode::NotFound
            ),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_matches_status() {
        let err = ClientError::Http { status: 502 };
        assert_eq!(err.to_string(), "HTTP error! status: 502");
        assert_eq!(err.status(), Some(502));
        assert!(err.is_server_error());
        assert_eq!(err.response_code(), None);
    }

    #[test]
    fn api_error_carries_code_and_message() {
        let err = ClientError::api(ResponseCode::Exists, "email taken", 200);
        assert_eq!(err.to_string(), "email taken");
        assert_eq!(err.response_code(), Some(ResponseCode::Exists));
        assert!(!err.is_server_error());
        assert!(err.field_codes().is_some_and(|c| c.is_empty()));
    }

    #[test]
    fn requires_login_covers_expired_sessions() {
        assert!(ClientError::SessionExpired.requires_login());
        assert!(ClientError::Http { status: 401 }.requires_login());
        assert!(ClientError::api(ResponseCode::Unauthenticated, "x", 200).requires_login());
        assert!(!ClientError::Http { status: 403 }.requires_login());
    }

    #[test]
    fn terminal_session_errors() {
        assert!(ClientError::decode("bad").is_terminal_for_session());
        assert!(ClientError::api(ResponseCode::Forbidden, "x", 200).is_terminal_for_session());
        assert!(!ClientError::Http { status: 500 }.is_terminal_for_session());
    }
}

//! OAuth provider redirects and callback resolution.
//!
//! The backend finishes the provider handshake and bounces the browser to
//! `/oauth/complete` with a status and a handful of query parameters.
//! [`resolve`] turns those parameters into the single next step; the
//! session service carries it out.

use std::fmt;

use crate::models::auth::{GStatus, OAuthCompleteQuery, OAuthRegisterRequest};
use crate::session::navigation::{DASHBOARD_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::session::tokens::TokenPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthService {
    Google,
    Meta,
    Microsoft,
}

impl OAuthService {
    pub const ALL: [OAuthService; 3] = [Self::Google, Self::Meta, Self::Microsoft];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Meta => "meta",
            Self::Microsoft => "microsoft",
        }
    }

    /// URL the user agent is sent to in order to start the provider flow.
    pub fn redirect_url(&self, api_base_url: &str) -> String {
        format!(
            "{}/auth/oauth/{}/redirect",
            api_base_url.trim_end_matches('/'),
            self.as_str()
        )
    }
}

impl fmt::Display for OAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an OAuth callback did not produce a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OAuthFailure {
    #[error("invalid OAuth callback parameters")]
    InvalidParams,
    #[error("OAuth callback did not include both tokens")]
    MissingTokens,
    #[error("OAuth callback is missing user information for registration")]
    MissingUserInfo,
    #[error("session error: {}", msg.as_deref().unwrap_or("unknown error"))]
    SessionError { msg: Option<String> },
    #[error("authentication error: {}", code.as_deref().unwrap_or("unknown error"))]
    AuthenticationError { code: Option<String> },
    #[error("registration failed: {detail}")]
    RegistrationFailed { detail: String },
}

impl OAuthFailure {
    /// Where the user lands after this failure.
    pub fn redirect_path(&self) -> &'static str {
        match self {
            OAuthFailure::MissingUserInfo | OAuthFailure::RegistrationFailed { .. } => REGISTER_PATH,
            _ => LOGIN_PATH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthAction {
    /// Persist the pair and continue to the dashboard.
    StoreTokens(TokenPair),
    /// Register the provider identity, then continue to the dashboard.
    Register(OAuthRegisterRequest),
    Reject(OAuthFailure),
}

impl OAuthAction {
    /// Destination once the action has been carried out successfully.
    pub fn success_path(&self) -> &'static str {
        match self {
            OAuthAction::StoreTokens(_) | OAuthAction::Register(_) => DASHBOARD_PATH,
            OAuthAction::Reject(failure) => failure.redirect_path(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Decides the next step for a parsed callback query.
pub fn resolve(query: &OAuthCompleteQuery) -> OAuthAction {
    match query.status {
        GStatus::SuccessfulJwtTokenProvided => {
            match (non_empty(&query.token), non_empty(&query.rtoken)) {
                (Some(access), Some(refresh)) => {
                    OAuthAction::StoreTokens(TokenPair::new(access, refresh))
                }
                _ => OAuthAction::Reject(OAuthFailure::MissingTokens),
            }
        }
        GStatus::SuccessfulUserNeedsRegister => match (
            non_empty(&query.name),
            non_empty(&query.surname),
            non_empty(&query.email),
            non_empty(&query.vcode),
        ) {
            (Some(name), Some(surname), Some(email), Some(vcode)) => {
                OAuthAction::Register(OAuthRegisterRequest {
                    name: name.to_string(),
                    surname: surname.to_string(),
                    email: email.to_string(),
                    oauth_code: vcode.to_string(),
                    birth_date: None,
                })
            }
            _ => OAuthAction::Reject(OAuthFailure::MissingUserInfo),
        },
        GStatus::SessionGenerationError => OAuthAction::Reject(OAuthFailure::SessionError {
            msg: query.msg.clone(),
        }),
        GStatus::AuthenticationError => OAuthAction::Reject(OAuthFailure::AuthenticationError {
            code: query.code.clone(),
        }),
    }
}

//! Request bodies and callback queries for the `/auth` endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::validation::{email, max_chars};
use crate::errors::{Validate, ValidationError};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identity: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(identity: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identity", &crate::logging::pii::Redacted(&self.identity))
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        max_chars("identity", &self.identity, 45)?;
        max_chars("password", &self.password, 70)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub token: String,
    pub refresh_token: String,
}

/// Registration with either a password or an OAuth verification code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub surname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_code: Option<String>,
    pub email: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

fn exactly_one_credential(
    password: Option<&String>,
    oauth_code: Option<&String>,
) -> Result<(), ValidationError> {
    match (password, oauth_code) {
        (None, None) => Err(ValidationError::new(
            "password",
            "Either 'password' or 'oauth_code' must be provided.",
        )),
        (Some(_), Some(_)) => Err(ValidationError::new(
            "oauth_code",
            "Cannot provide both 'password' and 'oauth_code'.",
        )),
        _ => Ok(()),
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        exactly_one_credential(self.password.as_ref(), self.oauth_code.as_ref())?;
        email("email", &self.email)?;
        if !lazy_regex::regex_is_match!(r"^\+\d+$", &self.phone_number) {
            return Err(ValidationError::new(
                "phone_number",
                "Phone number must start with a country code (e.g., +90) and contain no spaces.",
            ));
        }
        Ok(())
    }
}

/// Registration after an OAuth hand-off; providers do not supply a phone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthRegisterRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub oauth_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl Validate for OAuthRegisterRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.oauth_code.is_empty() {
            return Err(ValidationError::new(
                "password",
                "Either 'password' or 'oauth_code' must be provided.",
            ));
        }
        email("email", &self.email)
    }
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Registration {
    Password(RegisterRequest),
    OAuth(OAuthRegisterRequest),
}

impl Registration {
    /// Password sign-ups must confirm their e-mail before logging in.
    pub fn needs_email_verification(&self) -> bool {
        matches!(self, Registration::Password(r) if r.password.is_some())
    }
}

impl Validate for Registration {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Registration::Password(r) => r.validate(),
            Registration::OAuth(r) => r.validate(),
        }
    }
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Registration::Password(r)
    }
}

impl From<OAuthRegisterRequest> for Registration {
    fn from(r: OAuthRegisterRequest) -> Self {
        Registration::OAuth(r)
    }
}

/// Sign-up form input; only [`RegisterForm::into_request`] reaches the API.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub request: RegisterRequest,
    pub password_confirm: String,
}

impl Validate for RegisterForm {
    fn validate(&self) -> Result<(), ValidationError> {
        self.request.validate()?;
        if self.request.password.as_deref() != Some(self.password_confirm.as_str()) {
            return Err(ValidationError::new("passwordConfirm", "Passwords do not match"));
        }
        Ok(())
    }
}

impl RegisterForm {
    pub fn into_request(self) -> Result<RegisterRequest, ValidationError> {
        self.validate()?;
        Ok(self.request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

impl Validate for EmailRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        email("email", &self.email)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

impl fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("token", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Validate for ResetPasswordRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.token.is_empty() {
            return Err(ValidationError::new("token", "must not be empty"));
        }
        max_chars("password", &self.password, 70)
    }
}

/// Status reported to `/oauth/complete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GStatus {
    AuthenticationError = 0,
    SessionGenerationError = 1,
    SuccessfulUserNeedsRegister = 2,
    SuccessfulJwtTokenProvided = 3,
}

impl GStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::AuthenticationError),
            1 => Some(Self::SessionGenerationError),
            2 => Some(Self::SuccessfulUserNeedsRegister),
            3 => Some(Self::SuccessfulJwtTokenProvided),
            _ => None,
        }
    }
}

/// Query parameters of the `/oauth/complete` callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCompleteQuery {
    pub status: GStatus,
    pub code: Option<String>,
    pub msg: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub vcode: Option<String>,
    pub token: Option<String>,
    pub rtoken: Option<String>,
}

impl OAuthCompleteQuery {
    pub fn new(status: GStatus) -> Self {
        Self {
            status,
            code: None,
            msg: None,
            name: None,
            surname: None,
            email: None,
            vcode: None,
            token: None,
            rtoken: None,
        }
    }

    /// Builds the query from decoded key/value pairs. Unknown keys are
    /// ignored; a missing or non-numeric status, or a malformed e-mail,
    /// is rejected.
    pub fn from_params<K, V, I>(params: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut status = None;
        let mut query = Self::new(GStatus::AuthenticationError);

        for (key, value) in params {
            let value = value.into();
            match key.as_ref() {
                "status" => {
                    status = value.trim().parse::<i64>().ok().and_then(GStatus::from_code);
                    if status.is_none() {
                        return Err(ValidationError::new("status", "unknown OAuth status"));
                    }
                }
                "code" => query.code = Some(value),
                "msg" => query.msg = Some(value),
                "name" => query.name = Some(value),
                "surname" => query.surname = Some(value),
                "email" => query.email = Some(value),
                "vcode" => query.vcode = Some(value),
                "token" => query.token = Some(value),
                "rtoken" => query.rtoken = Some(value),
                _ => {}
            }
        }

        query.status = status.ok_or_else(|| ValidationError::new("status", "missing"))?;
        if let Some(addr) = &query.email {
            email("email", addr)?;
        }
        Ok(query)
    }

    /// Parses a full callback URL such as
    /// `https://portal.example/oauth/complete?status=3&token=..&rtoken=..`.
    pub fn from_url(url: &str) -> Result<Self, ValidationError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|_| ValidationError::new("url", "must be a valid URL"))?;
        Self::from_params(parsed.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())))
    }
}

/// Outcome codes for the `/register/complete` landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterCompleteStatus {
    InternalError = -1,
    UserNotFound = -2,
    Success = 0,
    FailedParse = 1,
}

impl RegisterCompleteStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::InternalError),
            -2 => Some(Self::UserNotFound),
            0 => Some(Self::Success),
            1 => Some(Self::FailedParse),
            _ => None,
        }
    }

    /// Reads the `code` query parameter.
    pub fn from_query(code: &str) -> Result<Self, ValidationError> {
        code.trim()
            .parse::<i64>()
            .ok()
            .and_then(Self::from_code)
            .ok_or_else(|| ValidationError::new("code", "unknown registration status"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password_registration() -> RegisterRequest {
        RegisterRequest {
            name: "Ada".into(),
            surname: "Lovelace".into(),
            password: Some("hunter22".into()),
            oauth_code: None,
            email: "ada@std.iyte.edu.tr".into(),
            phone_number: "+905551112233".into(),
            birth_date: None,
        }
    }

    #[test]
    fn login_limits() {
        assert!(LoginRequest::new("a".repeat(45), "p".repeat(70)).validate().is_ok());
        let err = LoginRequest::new("a".repeat(46), "p").validate().unwrap_err();
        assert_eq!(err.field, "identity");
        let err = LoginRequest::new("a", "p".repeat(71)).validate().unwrap_err();
        assert_eq!(err.field, "password");
    }

    #[test]
    fn login_debug_hides_password() {
        let dbg = format!("{:?}", LoginRequest::new("ada", "s3cret"));
        assert!(!dbg.contains("s3cret"));
    }

    #[test]
    fn register_requires_exactly_one_credential() {
        assert!(password_registration().validate().is_ok());

        let mut both = password_registration();
        both.oauth_code = Some("v".into());
        assert_eq!(both.validate().unwrap_err().field, "oauth_code");

        let mut neither = password_registration();
        neither.password = None;
        assert_eq!(neither.validate().unwrap_err().field, "password");
    }

    #[test]
    fn register_phone_needs_country_code() {
        let mut req = password_registration();
        req.phone_number = "05551112233".into();
        assert_eq!(req.validate().unwrap_err().field, "phone_number");
        req.phone_number = "+90 555".into();
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_form_checks_confirmation() {
        let form = RegisterForm {
            request: password_registration(),
            password_confirm: "other".into(),
        };
        assert_eq!(form.validate().unwrap_err().field, "passwordConfirm");

        let ok = RegisterForm {
            request: password_registration(),
            password_confirm: "hunter22".into(),
        };
        assert!(ok.into_request().is_ok());
    }

    #[test]
    fn oauth_registration_serializes_without_phone() {
        let reg = Registration::from(OAuthRegisterRequest {
            name: "Ada".into(),
            surname: "Lovelace".into(),
            email: "ada@example.com".into(),
            oauth_code: "v-1".into(),
            birth_date: None,
        });
        let json = serde_json::to_value(&reg).unwrap();
        assert!(json.get("phone_number").is_none());
        assert_eq!(json["oauth_code"], "v-1");
        assert!(!reg.needs_email_verification());
        assert!(Registration::from(password_registration()).needs_email_verification());
    }

    #[test]
    fn callback_query_from_url() {
        let q = OAuthCompleteQuery::from_url(
            "https://portal.example/oauth/complete?status=3&token=abc&rtoken=def&provider=google",
        )
        .unwrap();
        assert_eq!(q.status, GStatus::SuccessfulJwtTokenProvided);
        assert_eq!(q.token.as_deref(), Some("abc"));
        assert_eq!(q.rtoken.as_deref(), Some("def"));
    }

    #[test]
    fn callback_query_rejects_bad_status_and_email() {
        assert!(OAuthCompleteQuery::from_params([("status", "9")]).is_err());
        assert!(OAuthCompleteQuery::from_params([("token", "abc")]).is_err());
        assert!(OAuthCompleteQuery::from_params([("status", "abc")]).is_err());
        assert!(OAuthCompleteQuery::from_params([("status", "2"), ("email", "nope")]).is_err());
    }

    #[test]
    fn register_complete_codes() {
        assert_eq!(
            RegisterCompleteStatus::from_query("-2").unwrap(),
            RegisterCompleteStatus::UserNotFound
        );
        assert_eq!(
            RegisterCompleteStatus::from_query("0").unwrap(),
            RegisterCompleteStatus::Success
        );
        assert!(RegisterCompleteStatus::from_query("5").is_err());
    }
}

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::validation::{http_url, max_chars, min_chars};
use crate::errors::{Validate, ValidationError};
use crate::i18n::Locale;

/// Account returned by `/user/get` and the user listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub surname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub o_auth: bool,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub language: Locale,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub email_verification_code_expires: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_verification_code_expires: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Partial update sent to `PATCH /user/update`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn optional_url(field: &'static str, value: Option<&String>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_empty() => http_url(field, v),
        _ => Ok(()),
    }
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            min_chars("name", name.trim(), 2)?;
        }
        if let Some(surname) = &self.surname {
            min_chars("surname", surname.trim(), 2)?;
        }
        if let Some(description) = &self.description {
            max_chars("description", description, 500)?;
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            if !lazy_regex::regex_is_match!(r"^\+?[\d\s\-()]{10,20}$", phone) {
                return Err(ValidationError::new("phone", "must be a valid phone number"));
            }
        }
        optional_url("linkedin_url", self.linkedin_url.as_ref())?;
        optional_url("github_url", self.github_url.as_ref())
    }
}

#[cfg(test)]
pub(crate) fn test_user(id: i64, role: &str) -> User {
    User {
        id,
        name: "Test".into(),
        surname: "User".into(),
        password: None,
        o_auth: false,
        email: "test@example.com".into(),
        role: role.into(),
        is_verified: Some(true),
        language: Locale::Tr,
        email_verification_code_expires: None,
        phone_verification_code_expires: None,
        sessions: None,
        description: None,
        phone: None,
        linkedin_url: None,
        github_url: None,
    }
}

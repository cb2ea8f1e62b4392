//! Envelope response codes returned by the portal API.
//!
//! Every response body carries a numeric `code`. `Success` (0) is the only
//! value that lets data through; every other code becomes
//! [`ClientError::Api`](crate::error::ClientError::Api).
//!
//! The wire form is the number. The variant name is accepted as well since
//! some backend builds serialize the enum by name.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed taxonomy of API response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// Request succeeded
    Success,
    /// Unexpected server-side failure
    InternalError,
    /// Malformed or semantically invalid request
    InvalidRequest,
    /// No valid credentials were supplied
    Unauthenticated,
    /// Credentials lack the required role
    Unauthorized,
    /// Requested resource does not exist
    NotFound,
    /// Resource already exists
    Exists,
    /// Action not allowed for this caller
    Forbidden,
    /// Endpoint-specific failure; see `codes`
    ServiceSpecified,
}

impl ResponseCode {
    pub const ALL: [ResponseCode; 9] = [
        Self::Success,
        Self::InternalError,
        Self::InvalidRequest,
        Self::Unauthenticated,
        Self::Unauthorized,
        Self::NotFound,
        Self::Exists,
        Self::Forbidden,
        Self::ServiceSpecified,
    ];

    /// Canonical name of the code, as used by the backend's enum.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::InternalError => "InternalError",
            Self::InvalidRequest => "InvalidRequest",
            Self::Unauthenticated => "Unauthenticated",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "NotFound",
            Self::Exists => "Exists",
            Self::Forbidden => "Forbidden",
            Self::ServiceSpecified => "ServiceSpecified",
        }
    }

    /// Numeric wire value.
    pub const fn as_i64(&self) -> i64 {
        match self {
            Self::Success => 0,
            Self::InternalError => 1,
            Self::InvalidRequest => 2,
            Self::Unauthenticated => 3,
            Self::Unauthorized => 4,
            Self::NotFound => 5,
            Self::Exists => 6,
            Self::Forbidden => 7,
            Self::ServiceSpecified => 8,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_i64() == value)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResponseCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

struct ResponseCodeVisitor;

impl<'de> Visitor<'de> for ResponseCodeVisitor {
    type Value = ResponseCode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a response code between 0 and 8 or its name")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ResponseCode, E> {
        ResponseCode::from_i64(v)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ResponseCode, E> {
        i64::try_from(v)
            .ok()
            .and_then(ResponseCode::from_i64)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ResponseCode, E> {
        ResponseCode::from_name(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for ResponseCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ResponseCodeVisitor)
    }
}
